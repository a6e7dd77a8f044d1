mod logging;
pub use logging::*;

mod time;
pub use time::*;

mod vec2;
pub use vec2::*;

mod vec3;
pub use vec3::*;
