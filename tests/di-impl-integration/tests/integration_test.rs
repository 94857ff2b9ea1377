//! 容器装配场景的集中集成测试

use di_abstractions::{ContainerConfig, ContainerStats, DiContainer, Many};
use infrastructure_common::{DependencyError, Lifetime};
use di_impl::Container;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[derive(Debug, Clone, PartialEq)]
struct AppSettings {
    dsn: String,
    pool_size: usize,
}

trait ConnectionPool: Send + Sync {
    fn acquire(&self) -> String;
    fn size(&self) -> usize;
}

trait UserRepository: Send + Sync {
    fn find(&self, id: u32) -> Option<String>;
}

trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

struct FixedPool {
    dsn: String,
    size: usize,
}

impl ConnectionPool for FixedPool {
    fn acquire(&self) -> String {
        format!("conn:{}", self.dsn)
    }

    fn size(&self) -> usize {
        self.size
    }
}

struct SqlUsers {
    pool: Arc<dyn ConnectionPool>,
}

impl UserRepository for SqlUsers {
    fn find(&self, id: u32) -> Option<String> {
        (id == 1).then(|| format!("alice@{}", self.pool.acquire()))
    }
}

struct TickingClock(AtomicUsize);

impl Clock for TickingClock {
    fn now(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) as u64
    }
}

#[derive(Debug, thiserror::Error)]
#[error("配置项缺失: {0}")]
struct MissingSetting(&'static str);

/// 按应用启动顺序装配容器
fn wire_application(container: &mut Container) -> anyhow::Result<()> {
    container.singleton(|| AppSettings {
        dsn: "postgres://localhost/app".to_string(),
        pool_size: 4,
    })?;
    container.singleton(|settings: AppSettings| {
        Arc::new(FixedPool {
            dsn: settings.dsn,
            size: settings.pool_size,
        }) as Arc<dyn ConnectionPool>
    })?;
    container.transient(|pool: Arc<dyn ConnectionPool>| {
        Arc::new(SqlUsers { pool }) as Arc<dyn UserRepository>
    })?;
    Ok(())
}

#[test]
fn test_application_wiring() -> anyhow::Result<()> {
    init_test_logger();
    let mut container = Container::new();
    wire_application(&mut container)?;

    let mut email = None;
    container.make(|users: Arc<dyn UserRepository>| email = users.find(1))?;
    assert_eq!(email.as_deref(), Some("alice@conn:postgres://localhost/app"));

    let mut pool: Option<Arc<dyn ConnectionPool>> = None;
    container.make(&mut pool)?;
    assert_eq!(pool.map(|pool| pool.size()), Some(4));

    let stats = container.stats();
    assert_eq!(stats.registered_bindings, 3);
    assert_eq!(stats.active_singletons, 2);
    Ok(())
}

#[test]
fn test_registration_order_matters_for_singletons() {
    init_test_logger();
    let mut container = Container::new();

    // 单例的依赖必须先注册
    let error = container
        .singleton(|settings: AppSettings| {
            Arc::new(FixedPool {
                dsn: settings.dsn,
                size: settings.pool_size,
            }) as Arc<dyn ConnectionPool>
        })
        .unwrap_err();
    assert!(matches!(error, DependencyError::UnresolvedAbstraction { .. }));

    // 瞬时绑定的依赖在解析时才需要存在
    container
        .transient(|pool: Arc<dyn ConnectionPool>| {
            Arc::new(SqlUsers { pool }) as Arc<dyn UserRepository>
        })
        .unwrap();
    assert!(container.resolve::<Arc<dyn UserRepository>>().is_err());

    wire_application(&mut container).unwrap();
    assert!(container.resolve::<Arc<dyn UserRepository>>().is_ok());
}

#[test]
fn test_singleton_shared_by_dependents() -> anyhow::Result<()> {
    init_test_logger();
    let mut container = Container::new();
    container.singleton(|| Arc::new(TickingClock(AtomicUsize::new(0))) as Arc<dyn Clock>)?;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    container.transient(move |clock: Arc<dyn Clock>| {
        log.lock().push(clock.now());
        clock.now()
    })?;

    let first: u64 = container.resolve()?;
    let second: u64 = container.resolve()?;

    assert_eq!((first, second), (1, 3));
    assert_eq!(*seen.lock(), vec![0, 2]);
    Ok(())
}

#[test]
fn test_multi_output_resolver_feeds_other_bindings() -> anyhow::Result<()> {
    init_test_logger();
    let mut container = Container::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    container.singleton(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        let settings = AppSettings {
            dsn: "sqlite::memory:".to_string(),
            pool_size: 1,
        };
        let clock: Arc<dyn Clock> = Arc::new(TickingClock(AtomicUsize::new(100)));
        Many((settings, clock))
    })?;
    container.singleton(|settings: AppSettings, clock: Arc<dyn Clock>| {
        format!("{}@{}", settings.dsn, clock.now())
    })?;

    assert_eq!(container.resolve::<String>()?, "sqlite::memory:@100");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let lifetimes: Vec<Lifetime> = container
        .registered_abstractions()
        .into_iter()
        .map(|descriptor| descriptor.lifetime)
        .collect();
    assert_eq!(lifetimes, vec![Lifetime::Singleton; 3]);
    Ok(())
}

#[test]
fn test_failed_startup_leaves_container_usable() {
    init_test_logger();
    let mut container = Container::new();

    let error = container
        .try_singleton(|| -> Result<AppSettings, MissingSetting> { Err(MissingSetting("dsn")) })
        .unwrap_err();
    assert_eq!(error.to_string(), "配置项缺失: dsn");
    assert!(!container.is_registered::<AppSettings>());

    container
        .try_singleton(|| {
            Ok::<_, MissingSetting>(AppSettings {
                dsn: "fallback".to_string(),
                pool_size: 1,
            })
        })
        .unwrap();
    assert_eq!(container.resolve::<AppSettings>().unwrap().dsn, "fallback");
}

#[test]
fn test_config_loaded_from_json_limits_depth() {
    init_test_logger();
    let config: ContainerConfig = serde_json::from_str(
        r#"{ "enable_circular_dependency_detection": false, "max_resolution_depth": 2 }"#,
    )
    .unwrap();
    let mut container = Container::with_config(config);

    container.transient(|| 1_u8).unwrap();
    container.transient(|value: u8| u16::from(value)).unwrap();
    container.transient(|value: u16| u32::from(value)).unwrap();

    assert_eq!(container.resolve::<u16>().unwrap(), 1);
    let error = container.resolve::<u32>().unwrap_err();
    assert!(matches!(
        error,
        DependencyError::ResolutionDepthExceeded { max_depth: 2, .. }
    ));
}

#[test]
fn test_self_dependency_without_cycle_detection_is_bounded() {
    init_test_logger();
    let config = ContainerConfig {
        enable_circular_dependency_detection: false,
        max_resolution_depth: 16,
    };
    let mut container = Container::with_config(config);
    container.transient(|value: i64| value + 1).unwrap();

    assert!(matches!(
        container.resolve::<i64>(),
        Err(DependencyError::ResolutionDepthExceeded { .. })
    ));
}

#[test]
fn test_reset_then_rewire() -> anyhow::Result<()> {
    init_test_logger();
    let mut container = Container::new();
    wire_application(&mut container)?;
    let before = container.resolve::<Arc<dyn ConnectionPool>>()?;

    container.reset();
    assert_eq!(container.stats(), ContainerStats::default());

    wire_application(&mut container)?;
    let after = container.resolve::<Arc<dyn ConnectionPool>>()?;
    assert!(!Arc::ptr_eq(&before, &after));
    Ok(())
}
