//! A small library of bloqs: primitives, rotations, wire bookkeeping and
//! data loading.

mod basic;
mod bookkeeping;
mod data_loading;
mod rotation;

pub use basic::{And, CNOT, CSwap, Hadamard, MeasureZ, SGate, TGate, Toffoli, XGate};
pub use bookkeeping::{Allocate, Free, Join, Split};
pub use data_loading::{Qrom, QromData};
pub use rotation::{Rx, Rz, ZPowGate};
