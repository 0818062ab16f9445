use super::defaults::{
    MAX_AUTO_STOP_HOURS, MAX_DENSITY, MAX_MARGIN_DP, MAX_PERCENT_SIGN_CHARS, MIN_DENSITY,
};
use super::AppConfig;
use crate::layout::AnchorGravity;
use anyhow::{bail, Result};
use clap::Parser;

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Reject values the runtime cannot place or schedule.
    pub fn validate(&mut self) -> Result<()> {
        match AnchorGravity::from_code(self.clear_button_gravity) {
            Some(_) => {}
            None => bail!(
                "--clear-button-gravity {} is not a known gravity",
                self.clear_button_gravity
            ),
        }
        match AnchorGravity::from_code(self.ram_bar_gravity) {
            Some(AnchorGravity::Merged) => {
                bail!("--ram-bar-gravity cannot be merged into the navigation bar")
            }
            Some(_) => {}
            None => bail!(
                "--ram-bar-gravity {} is not a known gravity",
                self.ram_bar_gravity
            ),
        }
        for (flag, value) in [
            ("--margin-top-dp", self.margin_top_dp),
            ("--margin-bottom-dp", self.margin_bottom_dp),
        ] {
            if value > MAX_MARGIN_DP {
                bail!("{flag} must be between 0 and {MAX_MARGIN_DP}, got {value}");
            }
        }
        if !(MIN_DENSITY..=MAX_DENSITY).contains(&self.density) {
            bail!(
                "--density must be between {MIN_DENSITY} and {MAX_DENSITY}, got {}",
                self.density
            );
        }
        if self.auto_stop_hours > MAX_AUTO_STOP_HOURS {
            bail!(
                "--auto-stop-hours must be between 0 and {MAX_AUTO_STOP_HOURS}, got {}",
                self.auto_stop_hours
            );
        }
        if self.percent_sign.chars().count() > MAX_PERCENT_SIGN_CHARS {
            bail!("--percent-sign must be at most {MAX_PERCENT_SIGN_CHARS} characters");
        }
        Ok(())
    }
}
