mod params;
pub use params::{Params, apply_params};

mod path;
pub use path::{CompiledPath, RoutePattern, path_to_regex, transform_filename};

mod route;
pub use route::Route;
