pub mod thread_safety;
