use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use stagehand_pool_core::{
    BoxedCapability, CapabilityKind, InstanceId, ObjectPool, PoolCfg, PoolError, PoolFactory,
    Poolable, PoolRegistry, Template,
};

/// Stand-in for a host object built from a template.
#[derive(Debug)]
struct Prop {
    template: String,
    active: bool,
    pool_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct Projectile {
    damage: i32,
}

#[derive(Debug, Clone, PartialEq)]
struct AudioEmitter {
    volume: f32,
}

/// Shared observation points that outlive the factory once it moves into a pool.
#[derive(Clone, Default)]
struct Counters {
    created: Arc<AtomicUsize>,
    destroyed: Arc<AtomicUsize>,
    persisted: Arc<AtomicUsize>,
}

impl Counters {
    fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
    fn destroyed(&self) -> usize {
        self.destroyed.load(Ordering::SeqCst)
    }
    fn persisted(&self) -> usize {
        self.persisted.load(Ordering::SeqCst)
    }
}

struct TestFactory {
    counters: Counters,
    fail_create: bool,
    poolable: bool,
    capabilities: bool,
}

impl TestFactory {
    fn new(counters: Counters) -> Self {
        Self {
            counters,
            fail_create: false,
            poolable: true,
            capabilities: true,
        }
    }
}

impl PoolFactory for TestFactory {
    type Object = Prop;

    fn create(&mut self, template: &Template) -> Option<Prop> {
        if self.fail_create {
            return None;
        }
        self.counters.created.fetch_add(1, Ordering::SeqCst);
        Some(Prop {
            template: template.name.clone(),
            active: true,
            pool_key: None,
        })
    }

    fn destroy(&mut self, _object: Prop) {
        self.counters.destroyed.fetch_add(1, Ordering::SeqCst);
    }

    fn bind_poolable(&mut self, object: &mut Prop, pool_key: &str) -> bool {
        if !self.poolable {
            return false;
        }
        object.pool_key = Some(pool_key.to_string());
        true
    }

    fn capability(&mut self, _object: &Prop, kind: &CapabilityKind) -> Option<BoxedCapability> {
        if !self.capabilities {
            return None;
        }
        if *kind == CapabilityKind::of::<Projectile>() {
            Some(BoxedCapability::new(Projectile { damage: 7 }))
        } else if *kind == CapabilityKind::of::<AudioEmitter>() {
            Some(BoxedCapability::new(AudioEmitter { volume: 0.8 }))
        } else {
            None
        }
    }

    fn activate(&mut self, object: &mut Prop) {
        object.active = true;
    }

    fn deactivate(&mut self, object: &mut Prop) {
        object.active = false;
    }

    fn persist(&mut self, _object: &mut Prop) {
        self.counters.persisted.fetch_add(1, Ordering::SeqCst);
    }
}

fn mk_pool(count: usize) -> ObjectPool<TestFactory> {
    let mut pool = ObjectPool::new(TestFactory::new(Counters::default()));
    pool.initialize(
        Template::new("bullet"),
        CapabilityKind::of::<Projectile>(),
        PoolCfg {
            count,
            persistent: false,
        },
    );
    pool
}

#[test]
fn initialize_eagerly_fills_free_list() {
    let pool = mk_pool(5);
    assert_eq!(pool.count(), 5);
    assert_eq!(pool.total_created(), 5);
    assert_eq!(pool.loaned(), 0);
    assert!(pool.is_initialized());
}

#[test]
fn get_and_return_round_trip_restores_count() {
    let mut pool = mk_pool(3);
    let id = pool.get_object().unwrap();
    assert_eq!(pool.count(), 2);
    assert_eq!(pool.loaned(), 1);
    pool.return_object(id);
    assert_eq!(pool.count(), 3);
    assert_eq!(pool.loaned(), 0);
    assert_eq!(pool.total_created(), 3);
}

#[test]
fn five_instances_cycle_in_reverse_acquisition_order() {
    let mut pool = mk_pool(5);

    let mut loaned: Vec<InstanceId> = Vec::new();
    for _ in 0..5 {
        loaned.push(pool.get_object().unwrap());
    }
    assert_eq!(pool.count(), 0);
    let mut distinct = loaned.clone();
    distinct.sort_by_key(|id| id.0);
    distinct.dedup();
    assert_eq!(distinct.len(), 5);

    for id in &loaned {
        pool.return_object(*id);
    }
    assert_eq!(pool.count(), 5);

    // LIFO: the free list now pops in reverse acquisition order.
    for expected in loaned.iter().rev() {
        assert_eq!(pool.get_object(), Some(*expected));
    }
    assert_eq!(pool.total_created(), 5);
}

#[test]
fn empty_pool_grows_by_exactly_one() {
    let mut pool = mk_pool(0);
    assert_eq!(pool.count(), 0);

    let id = pool.get_object().expect("lazy growth should yield an instance");
    assert_eq!(pool.total_created(), 1);
    assert_eq!(pool.count(), 0);

    pool.return_object(id);
    assert_eq!(pool.count(), 1);
    assert_eq!(pool.total_created(), 1);
}

#[test]
fn double_return_is_a_noop() {
    let mut pool = mk_pool(1);
    let id = pool.get_object().unwrap();
    pool.return_object(id);
    pool.return_object(id);
    assert_eq!(pool.count(), 1);
    assert_eq!(pool.total_created(), 1);
}

#[test]
fn foreign_instance_return_is_a_noop() {
    let mut pool = mk_pool(1);
    pool.return_object(InstanceId(999));
    assert_eq!(pool.count(), 1);
}

#[test]
fn re_initialize_keeps_original_configuration() {
    let mut pool = mk_pool(2);
    pool.initialize(
        Template::new("rocket"),
        CapabilityKind::of::<AudioEmitter>(),
        PoolCfg {
            count: 9,
            persistent: true,
        },
    );
    assert_eq!(pool.count(), 2);
    assert_eq!(pool.template().unwrap().key(), "bullet");
    assert!(!pool.is_persistent());
}

#[test]
fn capability_lookups_discriminate_errors() {
    let mut pool = mk_pool(1);

    let (id, projectile) = pool.get_capability::<Projectile>().unwrap();
    assert_eq!(projectile, &Projectile { damage: 7 });

    // Wrong type: the stored capability is a Projectile.
    assert!(matches!(
        pool.capability::<AudioEmitter>(id),
        Err(PoolError::TypeMismatch { instance, .. }) if instance == id
    ));

    // Never registered: construction logged the miss, lookups report it.
    let mut factory = TestFactory::new(Counters::default());
    factory.capabilities = false;
    let mut bare = ObjectPool::new(factory);
    bare.initialize(
        Template::new("crate"),
        CapabilityKind::of::<Projectile>(),
        PoolCfg::default(),
    );
    let id = bare.get_object().unwrap();
    assert_eq!(
        bare.capability::<Projectile>(id),
        Err(PoolError::InstanceNotFound(id))
    );
}

#[test]
fn capability_mut_edits_stick_across_recycling() {
    let mut pool = mk_pool(1);
    let id = pool.get_object().unwrap();
    pool.capability_mut::<Projectile>(id).unwrap().damage = 42;
    pool.return_object(id);

    let (again, projectile) = pool.get_capability::<Projectile>().unwrap();
    assert_eq!(again, id);
    assert_eq!(projectile.damage, 42);
}

#[test]
fn default_poolable_capability_names_owning_pool() {
    let mut pool = ObjectPool::new(TestFactory::new(Counters::default()));
    pool.initialize(
        Template::new("spark"),
        CapabilityKind::of::<Poolable>(),
        PoolCfg::default(),
    );
    let (_, poolable) = pool.get_capability::<Poolable>().unwrap();
    assert_eq!(poolable.pool_key(), "spark");
}

#[test]
fn loaned_objects_are_active_until_returned() {
    let mut pool = mk_pool(1);
    let id = pool.get_object().unwrap();
    assert!(pool.object(id).unwrap().active);
    assert_eq!(pool.object(id).unwrap().template, "bullet");
    assert_eq!(
        pool.object(id).unwrap().pool_key.as_deref(),
        Some("bullet")
    );

    pool.return_object(id);
    assert!(!pool.object(id).unwrap().active);
}

#[test]
fn failed_construction_skips_slots() {
    let counters = Counters::default();
    let mut factory = TestFactory::new(counters.clone());
    factory.fail_create = true;
    let mut pool = ObjectPool::new(factory);
    pool.initialize(
        Template::new("bullet"),
        CapabilityKind::of::<Projectile>(),
        PoolCfg {
            count: 3,
            persistent: false,
        },
    );

    assert_eq!(pool.count(), 0);
    assert_eq!(pool.total_created(), 0);
    assert_eq!(counters.created(), 0);
    assert_eq!(pool.get_object(), None);
}

#[test]
fn missing_poolable_capability_skips_slots() {
    let counters = Counters::default();
    let mut factory = TestFactory::new(counters.clone());
    factory.poolable = false;
    let mut pool = ObjectPool::new(factory);
    pool.initialize(
        Template::new("bullet"),
        CapabilityKind::of::<Projectile>(),
        PoolCfg {
            count: 3,
            persistent: false,
        },
    );

    // Unpoolable instances are construction failures: destroyed, not pooled.
    assert_eq!(pool.count(), 0);
    assert_eq!(pool.total_created(), 0);
    assert_eq!(counters.created(), 3);
    assert_eq!(counters.destroyed(), 3);

    // Lazy growth hits the same failure and yields nothing.
    assert_eq!(pool.get_object(), None);
    assert_eq!(counters.destroyed(), 4);
}

#[test]
fn registry_directory_round_trip() {
    let registry = PoolRegistry::new();
    registry.initialize_pool(
        TestFactory::new(Counters::default()),
        Template::new("bullet"),
        CapabilityKind::of::<Projectile>(),
        PoolCfg {
            count: 2,
            persistent: false,
        },
    );
    assert_eq!(registry.len(), 1);

    let handle = registry.get("bullet").expect("pool should be registered");
    assert_eq!(handle.lock().unwrap().count(), 2);

    assert!(registry.get("missing").is_none());

    registry.remove("bullet");
    registry.remove("bullet");
    assert!(registry.is_empty());
}

#[test]
fn registry_resolves_pool_from_poolable_key() {
    let registry = PoolRegistry::new();
    registry.initialize_pool(
        TestFactory::new(Counters::default()),
        Template::new("spark"),
        CapabilityKind::of::<Poolable>(),
        PoolCfg {
            count: 1,
            persistent: false,
        },
    );

    // Borrow through the directory, learn the owning pool from the instance's
    // base capability, then return it the same way.
    let handle = registry.get("spark").unwrap();
    let (id, key) = {
        let mut pool = handle.lock().unwrap();
        let (id, poolable) = pool.get_capability::<Poolable>().unwrap();
        (id, poolable.pool_key().to_string())
    };

    let owner = registry.get(&key).unwrap();
    let mut pool = owner.lock().unwrap();
    pool.return_object(id);
    assert_eq!(pool.count(), 1);
}

#[test]
fn registry_clear_destroys_all_instances() {
    let counters = Counters::default();
    let registry = PoolRegistry::new();
    registry.initialize_pool(
        TestFactory::new(counters.clone()),
        Template::new("bullet"),
        CapabilityKind::of::<Projectile>(),
        PoolCfg {
            count: 3,
            persistent: false,
        },
    );
    registry.initialize_pool(
        TestFactory::new(counters.clone()),
        Template::new("spark"),
        CapabilityKind::of::<Poolable>(),
        PoolCfg {
            count: 2,
            persistent: false,
        },
    );
    assert_eq!(counters.created(), 5);

    registry.clear();
    assert!(registry.is_empty());
    assert_eq!(counters.destroyed(), 5);
}

#[test]
fn persistent_pool_marks_created_and_returned_instances() {
    let counters = Counters::default();
    let mut pool = ObjectPool::new(TestFactory::new(counters.clone()));
    pool.initialize(
        Template::new("music"),
        CapabilityKind::of::<AudioEmitter>(),
        PoolCfg {
            count: 2,
            persistent: true,
        },
    );
    assert!(pool.is_persistent());
    assert_eq!(counters.persisted(), 2);

    let id = pool.get_object().unwrap();
    pool.return_object(id);
    assert_eq!(counters.persisted(), 3);
}

#[test]
fn pool_cfg_fixture_drives_initialization() {
    let cfg: PoolCfg = stagehand_test_fixtures::pool_cfg_json("projectiles").unwrap();
    assert_eq!(cfg.count, 5);
    assert!(!cfg.persistent);

    let mut pool = ObjectPool::new(TestFactory::new(Counters::default()));
    pool.initialize(Template::new("bullet"), CapabilityKind::of::<Projectile>(), cfg);
    assert_eq!(pool.count(), 5);

    let persistent: PoolCfg = stagehand_test_fixtures::pool_cfg_json("persistent-audio").unwrap();
    assert!(persistent.persistent);
    assert_eq!(persistent.count, 2);
}
