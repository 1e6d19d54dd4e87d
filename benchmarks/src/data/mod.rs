mod cars;

pub use cars::{synthetic_cars, SyntheticCars};
