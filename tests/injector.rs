use autowire::{
    params, Arguments, Config, Container as _, Declaration, DefaultContainer, Injector, InjectorErrorKind, Instance,
    InstantiateErrorKind, Parameter, Parameters, Registry, RegistryBuilder, Value,
};
use std::sync::Arc;

trait Logger: Send + Sync {
    fn name(&self) -> &'static str;
}

struct FileLogger {
    path: String,
}

impl Logger for FileLogger {
    fn name(&self) -> &'static str {
        "file"
    }
}

struct NullLogger;

impl Logger for NullLogger {
    fn name(&self) -> &'static str {
        "null"
    }
}

struct Mailer {
    host: String,
    port: i64,
    logger: Arc<dyn Logger>,
}

fn logger(arguments: &Arguments, name: &str) -> Result<Arc<dyn Logger>, InstantiateErrorKind> {
    let value = arguments.get(name)?;
    let instance = value.as_instance().ok_or_else(|| anyhow::anyhow!("{name} is not an object"))?;

    if let Some(logger) = instance.downcast::<FileLogger>() {
        return Ok(logger);
    }
    if let Some(logger) = instance.downcast::<NullLogger>() {
        return Ok(logger);
    }
    Err(anyhow::anyhow!("{} is not a logger", instance.class()).into())
}

fn registry() -> Registry {
    RegistryBuilder::new()
        .declare(Declaration::interface("App.Logger"))
        .provide(
            Declaration::class("App.FileLogger")
                .implements("App.Logger")
                .param(Parameter::new("path").typed("string").with_default("/var/log/app.log")),
            |arguments: Arguments| -> Result<_, InstantiateErrorKind> {
                Ok(FileLogger {
                    path: arguments.string("path")?.into(),
                })
            },
        )
        .provide(Declaration::class("App.NullLogger").implements("App.Logger"), |_: Arguments| {
            Ok::<_, InstantiateErrorKind>(NullLogger)
        })
        .provide(
            Declaration::class("App.Mailer")
                .param(Parameter::new("host").typed("string"))
                .param(Parameter::new("port").typed("int").with_default(25))
                .param(Parameter::new("logger").typed("App.Logger")),
            |arguments: Arguments| -> Result<_, InstantiateErrorKind> {
                Ok(Mailer {
                    host: arguments.string("host")?.into(),
                    port: arguments.int("port")?,
                    logger: logger(&arguments, "logger")?,
                })
            },
        )
        .build()
}

const CONFIG: &str = r#"{
    "preferences": { "App.Logger": "App.FileLogger" },
    "types": {
        "App.Mailer": { "parameters": { "host": "smtp.example.com" } },
        "App.AdminMailer": {
            "typeOf": "App.Mailer",
            "parameters": { "port": 587 },
            "preferences": { "App.Logger": "App.NullLogger" }
        }
    }
}"#;

fn injector() -> Arc<Injector> {
    Injector::builder()
        .definition(registry())
        .config(Config::from_json(CONFIG).unwrap())
        .build()
}

#[test]
fn test_create_from_json_config() {
    let injector = injector();

    let mailer = injector.create("App.Mailer", &Parameters::new()).unwrap();
    let mailer = mailer.downcast::<Mailer>().unwrap();

    assert_eq!(mailer.host, "smtp.example.com");
    assert_eq!(mailer.port, 25);
    assert_eq!(mailer.logger.name(), "file");
}

#[test]
fn test_create_alias() {
    let injector = injector();

    let instance = injector.create("App.AdminMailer", &Parameters::new()).unwrap();
    assert_eq!(instance.class(), "App.Mailer");

    let mailer = instance.downcast::<Mailer>().unwrap();
    assert_eq!(mailer.host, "smtp.example.com");
    assert_eq!(mailer.port, 587);
    assert_eq!(mailer.logger.name(), "null");
}

#[test]
fn test_call_time_parameters_win() {
    let injector = injector();

    let mailer = injector
        .create("App.AdminMailer", &params! { "host" => "localhost", "port" => 2525 })
        .unwrap();
    let mailer = mailer.downcast::<Mailer>().unwrap();

    assert_eq!(mailer.host, "localhost");
    assert_eq!(mailer.port, 2525);
}

#[test]
fn test_dependencies_are_shared_through_container() {
    let injector = injector();

    let first = injector.create("App.Mailer", &Parameters::new()).unwrap();
    let second = injector.create("App.Mailer", &Parameters::new()).unwrap();
    assert!(!first.ptr_eq(&second));

    let first = first.downcast::<Mailer>().unwrap();
    let second = second.downcast::<Mailer>().unwrap();
    assert!(Arc::ptr_eq(&first.logger, &second.logger));

    let file_logger = injector.container().get("App.FileLogger").unwrap();
    assert_eq!(
        file_logger.as_instance().unwrap().downcast::<FileLogger>().unwrap().path,
        "/var/log/app.log"
    );
}

#[test]
fn test_registered_instance_is_injected() {
    let injector = injector();
    let container = DefaultContainer::new(Arc::downgrade(&injector));
    container.set_instance(
        "App.FileLogger",
        Instance::new("App.FileLogger", FileLogger { path: "/tmp/app.log".into() }),
    );
    injector.set_container(Arc::new(container));

    let mailer = injector.create("App.Mailer", &Parameters::new()).unwrap();
    let mailer = mailer.downcast::<Mailer>().unwrap();
    assert_eq!(mailer.logger.name(), "file");

    let logger = injector.container().get("App.FileLogger").unwrap();
    assert_eq!(logger.as_instance().unwrap().downcast::<FileLogger>().unwrap().path, "/tmp/app.log");
}

#[test]
fn test_missing_configuration_fails() {
    let injector = Injector::builder().definition(registry()).build();

    let err = injector.create("App.Mailer", &Parameters::new()).unwrap_err();
    assert!(matches!(err, InjectorErrorKind::Resolve(_)));
    assert_eq!(
        err.to_string(),
        r#"Could not resolve value for parameter "host" of type string in class App.Mailer (requested as App.Mailer)"#
    );

    let err = injector
        .create("App.Mailer", &params! { "host" => "localhost", "logger" => Value::from(1) })
        .unwrap_err();
    assert!(matches!(err, InjectorErrorKind::Instantiate { .. }));
}
