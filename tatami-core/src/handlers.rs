mod command_handler;
mod focus_handler;
mod mouse_handler;
mod property_handler;
mod window_handler;
