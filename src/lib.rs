//! Namesmith - Standardized File Name Bot
//!
//! This crate implements a Slack workspace bot that walks users through a
//! short scripted intake dialog and forges a standardized file name from
//! the captured answers.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
