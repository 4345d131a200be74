use dotenvy::dotenv;
use lazy_static::lazy_static;
use secrecy::Secret;
use std::env as std_env;

lazy_static! {
    pub static ref FIRESTORE_BASE_URL: String = load_or_default(
        env::FIRESTORE_BASE_URL_ENV_VAR,
        DEFAULT_FIRESTORE_BASE_URL
    );
    pub static ref FIRESTORE_PROJECT_ID: String = get_project_id();
    pub static ref FIRESTORE_API_KEY: Option<Secret<String>> = get_api_key();
    pub static ref PREFERENCES_DIR: String = load_or_default(
        env::PREFERENCES_DIR_ENV_VAR,
        DEFAULT_PREFERENCES_DIR
    );
}

fn load_env() {
    dotenv().ok();
}

fn get_project_id() -> String {
    load_env();
    let project_id = std_env::var(env::FIRESTORE_PROJECT_ID_ENV_VAR)
        .expect("FIRESTORE_PROJECT_ID must be set.");
    if project_id.is_empty() {
        panic!("FIRESTORE_PROJECT_ID must not be empty.");
    }
    project_id
}

fn get_api_key() -> Option<Secret<String>> {
    load_env();
    std_env::var(env::FIRESTORE_API_KEY_ENV_VAR)
        .ok()
        .filter(|key| !key.is_empty())
        .map(Secret::new)
}

fn load_or_default(variable_name: &str, default_value: &str) -> String {
    load_env();

    match std_env::var(variable_name) {
        Ok(value) => {
            if value.is_empty() {
                String::from(default_value)
            } else {
                value
            }
        }
        Err(_) => String::from(default_value),
    }
}

pub mod env {
    pub const FIRESTORE_BASE_URL_ENV_VAR: &str = "FIRESTORE_BASE_URL";
    pub const FIRESTORE_PROJECT_ID_ENV_VAR: &str = "FIRESTORE_PROJECT_ID";
    pub const FIRESTORE_API_KEY_ENV_VAR: &str = "FIRESTORE_API_KEY";
    pub const PREFERENCES_DIR_ENV_VAR: &str = "PREFERENCES_DIR";
}

pub const DEFAULT_FIRESTORE_BASE_URL: &str =
    "https://firestore.googleapis.com/v1";
pub const DEFAULT_PREFERENCES_DIR: &str = ".sociostack";
pub const PREFERENCES_FILE_NAME: &str = "user_prefs.json";
pub const ROLE_PREFERENCE_KEY: &str = "user_role";

pub mod collections {
    pub const MEMBERS: &str = "members";
    pub const ANNOUNCEMENTS: &str = "announcements";
}

pub mod prod {
    pub mod firestore {
        use std::time::Duration;

        pub const TIMEOUT: Duration = Duration::from_secs(10);
        pub const POLL_INTERVAL: Duration = Duration::from_secs(5);
    }
}

pub mod test {
    pub mod firestore {
        use std::time::Duration;

        pub const TIMEOUT: Duration = Duration::from_millis(200);
        pub const POLL_INTERVAL: Duration = Duration::from_millis(20);
    }
}
