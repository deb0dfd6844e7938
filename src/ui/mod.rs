/// Drawing and input only; all state changes go through `AppState::apply`.
pub mod layers;
pub mod panels;
pub mod plot;
