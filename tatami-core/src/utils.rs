pub mod child_process;
pub mod xkeysym_lookup;
