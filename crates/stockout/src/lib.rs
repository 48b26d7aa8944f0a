//! Stockout prediction: slot-by-slot forward simulation of consumption
//! over the operating calendar.

pub mod predictor;

pub use predictor::{StockoutPrediction, predict};
