//! Cross-module scenarios: membership consistency, iteration safety and the
//! transform hierarchy driven through the scene

mod iteration;
