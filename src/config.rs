pub mod env_var {
    use lazy_static::lazy_static;
    use tracing::Level;

    lazy_static! {
        static ref ENV_VAR: EnvVar = load_env();
    }

    #[derive(Debug, Clone)]
    pub struct EnvVar {
        pub port: u16,
        pub log_level: Level,
        pub database_host: String,
        pub database_port: u16,
        pub database_name: String,
        pub database_url: String,
        pub database_max_connections: u32,
    }

    macro_rules! get_env {
        ($env:literal) => {
            std::env::var($env).expect(concat!("Missing env var ", $env))
        };
        ($env:literal, $default:literal) => {
            std::env::var($env).unwrap_or_else(|_| $default.to_string())
        };
    }

    fn load_env() -> EnvVar {
        let port: u16 = get_env!("PORT").parse().expect("Invalid PORT");
        let log_level: Level = get_env!("LOG_LEVEL", "info")
            .parse()
            .expect("Invalid LOG_LEVEL");
        let database_host = get_env!("DATABASE_HOST");
        let database_name = get_env!("DATABASE_NAME");
        let database_user = get_env!("DATABASE_USER");
        let database_password = get_env!("DATABASE_PASSWORD");
        let database_port: u16 = get_env!("DATABASE_PORT")
            .parse()
            .expect("Invalid DATABASE_PORT");
        let database_max_connections: u32 = get_env!("DATABASE_MAX_CONNECTIONS", "5")
            .parse()
            .expect("Invalid DATABASE_MAX_CONNECTIONS");

        let database_url = format!("postgres://{database_user}:{database_password}@{database_host}:{database_port}/{database_name}");

        EnvVar {
            port,
            log_level,
            database_host,
            database_name,
            database_port,
            database_url,
            database_max_connections,
        }
    }

    pub fn get() -> &'static EnvVar {
        &ENV_VAR
    }
}
