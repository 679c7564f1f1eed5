use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Weak,
};

use dashmap::DashMap;
use once_cell::sync::Lazy;

/// Размер пула, ниже которого очистка не запускается.
const MIN_SWEEP_LEN: usize = 64;

/// Пул префиксов. Хранит только слабые ссылки: префикс живёт, пока жив
/// хотя бы один `Pattern` с ним.
static TOPIC_INTERN: Lazy<DashMap<Box<str>, Weak<str>>> = Lazy::new(DashMap::new);

/// Размер пула, при превышении которого из него выбрасываются мёртвые
/// записи.
static SWEEP_AT: AtomicUsize = AtomicUsize::new(MIN_SWEEP_LEN);

/// Возвращает общий `Arc<str>` для префикса, пока он кем-то используется.
///
/// Мёртвые записи не удаляются сразу: пул чистится, когда вырастает вдвое
/// относительно числа живых записей после прошлой очистки.
pub(crate) fn intern_topic<S: AsRef<str>>(topic: S) -> Arc<str> {
    let key = topic.as_ref();
    if let Some(live) = TOPIC_INTERN.get(key).and_then(|weak| weak.upgrade()) {
        return live;
    }

    let fresh: Arc<str> = Arc::from(key);
    let interned = {
        let mut slot = TOPIC_INTERN
            .entry(Box::from(key))
            .or_insert_with(|| Arc::downgrade(&fresh));
        match slot.upgrade() {
            Some(live) => live,
            None => {
                *slot = Arc::downgrade(&fresh);
                fresh
            }
        }
    };

    if TOPIC_INTERN.len() > SWEEP_AT.load(Ordering::Relaxed) {
        sweep();
    }
    interned
}

fn sweep() {
    TOPIC_INTERN.retain(|_, weak| weak.strong_count() > 0);
    let next = (TOPIC_INTERN.len() * 2).max(MIN_SWEEP_LEN);
    SWEEP_AT.store(next, Ordering::Relaxed);
}

/// Текущее число записей в пуле, включая ещё не вычищенные.
pub(crate) fn pool_len() -> usize {
    TOPIC_INTERN.len()
}
