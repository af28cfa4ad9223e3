mod hook_protocol;
mod logging;
mod timeout;
