//! Tic-tac-toe for evolved neural networks: the game itself,
//! human, network and scripted players, and a co-evolutionary
//! training session built on `neuroevo`.

pub mod errors;
pub mod game;
pub mod players;
pub mod training;
