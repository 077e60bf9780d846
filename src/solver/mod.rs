pub mod diffusion;
pub mod hypercut;
pub mod push;
mod traits;
pub use self::traits::*;
