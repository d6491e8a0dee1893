// App layer: terminal front end over the core engine.

#[cfg(feature = "cli")]
pub mod display;
pub mod interactive;
