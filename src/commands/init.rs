//! Configuration initialization command.
//!
//! Writes the configuration file with current (or default) values so it can
//! be edited by hand. Existing settings are preserved.

use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::msg_success;
use anyhow::Result;

pub fn cmd() -> Result<()> {
    let config = Config::read()?;
    let path = config.save()?;
    msg_success!(Message::ConfigSaved(path));
    Ok(())
}
