//! `probtutor config`: print the effective configuration.

use probtutor_config::schema::ProbTutorConfig;

pub fn run(config: &ProbTutorConfig) {
    print!("{}", probtutor_config::config_to_toml(config));
}
