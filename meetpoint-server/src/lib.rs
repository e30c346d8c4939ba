//! Meeting-point planner server.
//!
//! A web application that answers: "where can all of us reach within the
//! same travel time, and what is there to do once we meet?"

pub mod cache;
pub mod config;
pub mod domain;
pub mod engine;
pub mod geometry;
pub mod providers;
pub mod share;
pub mod web;
