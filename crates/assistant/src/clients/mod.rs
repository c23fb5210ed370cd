//! HTTP clients for the services the assistant depends on.

pub mod nominatim;
pub mod restaurant;
pub mod viacep;

pub use nominatim::NominatimClient;
pub use restaurant::RestaurantClient;
pub use viacep::{CepAddress, ViaCepClient, ViaCepError};
