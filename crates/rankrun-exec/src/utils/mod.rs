mod path;
pub use path::resolve_program;

mod status;
pub use status::exit_code;
