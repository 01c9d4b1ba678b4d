//! Formula scripts
//!
//! A script is a text file holding a formula, plus optional comment and
//! directive lines:
//!
//! ```text
//! # Lines starting with '#' are comments
//! #! -5 -5 5 5
//! x^2 + y^2
//!     - 16
//! ```
//!
//! - A line starting with `#!` sets the render region from four numbers, `x1
//!   y1 x2 y2`, naming two opposite corners.  A directive with some other
//!   number of fields is ignored; if any of the four fields isn't a finite
//!   number, the region is reset to the default (with a warning).  The last
//!   directive wins.
//! - Any other line starting with `#` is a comment.
//! - Remaining lines are joined with newlines to build the formula.
use crate::{Error, render::Region, vm::Program};
use std::path::Path;

/// Formula text and render region loaded from a script
#[derive(Clone, Debug, PartialEq)]
pub struct Script {
    /// Formula text, with comment and directive lines removed
    pub formula: String,
    /// Render region, from the last valid `#!` directive
    pub region: Region,
}

impl Script {
    /// Parses a script from text
    ///
    /// This never fails; problems with the formula itself are reported when
    /// it is compiled.
    ///
    /// ```
    /// # use zerocurve::{render::Region, script::Script};
    /// let s = Script::from_text("#! 0 0 4 2\nx - y");
    /// assert_eq!(s.formula, "x - y");
    /// assert_eq!(s.region, Region::from_corners(0.0, 0.0, 4.0, 2.0));
    /// ```
    pub fn from_text(text: &str) -> Self {
        let mut region = Region::default();
        let mut lines = vec![];
        for line in text.lines() {
            if let Some(d) = line.strip_prefix("#!") {
                let parts: Vec<&str> = d.split_whitespace().collect();
                if parts.len() != 4 {
                    log::debug!("ignoring directive {line:?}");
                    continue;
                }
                let coords: Result<Vec<f64>, _> =
                    parts.iter().map(|p| p.parse::<f64>()).collect();
                region = match coords.as_deref() {
                    Ok(&[x1, y1, x2, y2]) => {
                        let r = Region::from_corners(x1, y1, x2, y2);
                        if r.is_finite() {
                            r
                        } else {
                            log::warn!("region {line:?} is not finite");
                            Region::default()
                        }
                    }
                    _ => {
                        log::warn!("invalid region {line:?}; using default");
                        Region::default()
                    }
                };
            } else if !line.starts_with('#') {
                lines.push(line);
            }
        }
        Self {
            formula: lines.join("\n"),
            region,
        }
    }

    /// Reads and parses a script file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_text(&text))
    }

    /// Parses and compiles the script's formula
    pub fn program(&self) -> Result<Program, Error> {
        Program::from_text(&self.formula)
    }
}
