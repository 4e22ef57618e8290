use std::{
    any::{
        type_name,
        Any,
        TypeId,
    },
    cell::{
        Cell,
        Ref,
        RefCell,
        RefMut,
    },
    collections::{
        hash_map::DefaultHasher,
        HashMap,
    },
    hash::{
        Hash,
        Hasher,
    },
};

use anyhow::{
    anyhow,
    Context,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateCacheType {
    /// Survives invalidation. `State::update` runs on the first resolve afterwards.
    Persistent,

    /// Dropped on every invalidation and recreated on demand.
    Volatile,
}

pub trait State: Any + Sized {
    type Parameter: Hash + Eq + 'static;

    fn create(_states: &StateRegistry, _param: Self::Parameter) -> anyhow::Result<Self> {
        Err(anyhow!("state {} must be set manually", type_name::<Self>()))
    }

    fn cache_type() -> StateCacheType {
        StateCacheType::Persistent
    }

    fn update(&mut self, _states: &StateRegistry) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct StateKey {
    type_id: TypeId,
    param_hash: u64,
}

impl StateKey {
    fn new<T: State>(param: &T::Parameter) -> Self {
        let mut hasher = DefaultHasher::new();
        param.hash(&mut hasher);

        Self {
            type_id: TypeId::of::<T>(),
            param_hash: hasher.finish(),
        }
    }
}

struct StateEntry {
    value: RefCell<Box<dyn Any>>,
    cache_type: StateCacheType,
    dirty: Cell<bool>,
}

impl StateEntry {
    fn new<T: State>(value: T) -> Self {
        Self {
            value: RefCell::new(Box::new(value)),
            cache_type: T::cache_type(),
            dirty: Cell::new(false),
        }
    }
}

/// Typed cache of per-frame and long lived values.
///
/// Entries are boxed and only ever removed through `&mut self`, therefore
/// references handed out through `&self` stay valid while new entries get
/// inserted (e.g. when a state resolves other states during `create`).
pub struct StateRegistry {
    states: RefCell<HashMap<StateKey, Box<StateEntry>>>,
}

impl StateRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            states: RefCell::new(HashMap::with_capacity(capacity)),
        }
    }

    pub fn len(&self) -> usize {
        self.states.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn set<T: State>(&mut self, value: T, param: T::Parameter) -> anyhow::Result<()> {
        let key = StateKey::new::<T>(&param);
        self.states
            .get_mut()
            .insert(key, Box::new(StateEntry::new(value)));
        Ok(())
    }

    /// Drop all volatile states and mark persistent states for an update.
    pub fn invalidate_states(&mut self) {
        let states = self.states.get_mut();
        states.retain(|_, entry| entry.cache_type != StateCacheType::Volatile);
        for entry in states.values() {
            entry.dirty.set(true);
        }
    }

    fn lookup_entry(&self, key: &StateKey) -> Option<&StateEntry> {
        let states = self.states.borrow();
        let entry: *const StateEntry = &**states.get(key)?;

        /* SAFETY: the entry is boxed and can only be removed through `&mut self` */
        Some(unsafe { &*entry })
    }

    fn resolve_entry<T: State>(&self, param: T::Parameter) -> anyhow::Result<&StateEntry> {
        let key = StateKey::new::<T>(&param);
        if let Some(entry) = self.lookup_entry(&key) {
            if entry.dirty.replace(false) {
                let mut value = entry
                    .value
                    .try_borrow_mut()
                    .map_err(|_| anyhow!("state {} is currently borrowed", type_name::<T>()))?;

                if let Some(value) = value.downcast_mut::<T>() {
                    if let Err(error) = value.update(self) {
                        entry.dirty.set(true);
                        return Err(error)
                            .with_context(|| format!("failed to update state {}", type_name::<T>()));
                    }
                }
            }

            return Ok(entry);
        }

        let value = T::create(self, param)
            .with_context(|| format!("failed to create state {}", type_name::<T>()))?;

        let mut states = self.states.borrow_mut();
        let entry: *const StateEntry = &**states
            .entry(key)
            .or_insert_with(|| Box::new(StateEntry::new(value)));
        drop(states);

        /* SAFETY: see `lookup_entry` */
        Ok(unsafe { &*entry })
    }

    pub fn resolve<T: State>(&self, param: T::Parameter) -> anyhow::Result<Ref<'_, T>> {
        let entry = self.resolve_entry::<T>(param)?;
        let value = entry
            .value
            .try_borrow()
            .map_err(|_| anyhow!("state {} is currently mutably borrowed", type_name::<T>()))?;

        Ref::filter_map(value, |value| value.downcast_ref::<T>())
            .map_err(|_| anyhow!("state {} has an unexpected type", type_name::<T>()))
    }

    pub fn resolve_mut<T: State>(&self, param: T::Parameter) -> anyhow::Result<RefMut<'_, T>> {
        let entry = self.resolve_entry::<T>(param)?;
        let value = entry
            .value
            .try_borrow_mut()
            .map_err(|_| anyhow!("state {} is currently borrowed", type_name::<T>()))?;

        RefMut::filter_map(value, |value| value.downcast_mut::<T>())
            .map_err(|_| anyhow!("state {} has an unexpected type", type_name::<T>()))
    }

    /// Access a state without creating or updating it.
    pub fn get<T: State>(&self, param: T::Parameter) -> Option<Ref<'_, T>> {
        let entry = self.lookup_entry(&StateKey::new::<T>(&param))?;
        let value = entry.value.try_borrow().ok()?;
        Ref::filter_map(value, |value| value.downcast_ref::<T>()).ok()
    }

    pub fn get_mut<T: State>(&self, param: T::Parameter) -> Option<RefMut<'_, T>> {
        let entry = self.lookup_entry(&StateKey::new::<T>(&param))?;
        let value = entry.value.try_borrow_mut().ok()?;
        RefMut::filter_map(value, |value| value.downcast_mut::<T>()).ok()
    }
}

impl Default for StateRegistry {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    thread_local! {
        static FRAME_COUNTER_CREATED: Cell<usize> = Cell::new(0);
    }

    struct Settings {
        scale: u32,
    }

    impl State for Settings {
        type Parameter = ();
    }

    struct FrameCounter {
        value: u32,
    }

    impl State for FrameCounter {
        type Parameter = ();

        fn create(states: &StateRegistry, _param: Self::Parameter) -> anyhow::Result<Self> {
            FRAME_COUNTER_CREATED.with(|count| count.set(count.get() + 1));
            let settings = states.resolve::<Settings>(())?;
            Ok(Self {
                value: settings.scale,
            })
        }

        fn cache_type() -> StateCacheType {
            StateCacheType::Volatile
        }
    }

    struct Ticks {
        count: u32,
    }

    impl State for Ticks {
        type Parameter = ();

        fn create(_states: &StateRegistry, _param: Self::Parameter) -> anyhow::Result<Self> {
            Ok(Self { count: 0 })
        }

        fn update(&mut self, _states: &StateRegistry) -> anyhow::Result<()> {
            self.count += 1;
            Ok(())
        }
    }

    struct Indexed {
        index: usize,
    }

    impl State for Indexed {
        type Parameter = usize;

        fn create(_states: &StateRegistry, index: Self::Parameter) -> anyhow::Result<Self> {
            Ok(Self { index })
        }
    }

    #[test]
    fn manual_state_must_be_set() {
        let states = StateRegistry::new(8);
        assert!(states.resolve::<Settings>(()).is_err());
        assert!(states.get::<Settings>(()).is_none());
    }

    #[test]
    fn volatile_state_is_recreated_after_invalidation() {
        let mut states = StateRegistry::new(8);
        states.set(Settings { scale: 3 }, ()).unwrap();

        let created_before = FRAME_COUNTER_CREATED.with(Cell::get);
        assert_eq!(states.resolve::<FrameCounter>(()).unwrap().value, 3);
        assert_eq!(states.resolve::<FrameCounter>(()).unwrap().value, 3);
        assert_eq!(FRAME_COUNTER_CREATED.with(Cell::get), created_before + 1);

        states.invalidate_states();
        assert!(states.get::<FrameCounter>(()).is_none());
        assert!(states.get::<Settings>(()).is_some());

        states.get_mut::<Settings>(()).unwrap().scale = 7;
        assert_eq!(states.resolve::<FrameCounter>(()).unwrap().value, 7);
        assert_eq!(FRAME_COUNTER_CREATED.with(Cell::get), created_before + 2);
    }

    #[test]
    fn persistent_state_updates_once_per_invalidation() {
        let mut states = StateRegistry::new(8);
        assert_eq!(states.resolve::<Ticks>(()).unwrap().count, 0);

        states.invalidate_states();
        assert_eq!(states.resolve::<Ticks>(()).unwrap().count, 1);
        assert_eq!(states.resolve::<Ticks>(()).unwrap().count, 1);

        states.invalidate_states();
        states.invalidate_states();
        assert_eq!(states.resolve::<Ticks>(()).unwrap().count, 2);
    }

    #[test]
    fn parameters_select_distinct_states() {
        let states = StateRegistry::new(8);
        assert_eq!(states.resolve::<Indexed>(1).unwrap().index, 1);
        assert_eq!(states.resolve::<Indexed>(2).unwrap().index, 2);
        assert_eq!(states.len(), 2);
    }

    #[test]
    fn conflicting_borrow_is_an_error() {
        let states = StateRegistry::new(8);
        let _guard = states.resolve_mut::<Ticks>(()).unwrap();
        assert!(states.resolve::<Ticks>(()).is_err());
    }
}
