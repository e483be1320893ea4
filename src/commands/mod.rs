pub mod accept;
pub mod context;
pub mod init;
pub mod list;
pub mod run;

pub use accept::{run_accept, run_accept_impl};
pub use context::build_harness;
pub use init::{generate_config_template, run_init, run_init_impl};
pub use list::{format_check_list, run_list, run_list_impl};
pub use run::{run_check, run_checks, run_run, run_run_impl, select_checks};
