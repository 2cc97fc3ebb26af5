use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Failed,
    Broken,
    Passed,
    Skipped,
    Unknown,
}

impl Default for Status {
    fn default() -> Self {
        Status::Unknown
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "failed" => Ok(Status::Failed),
            "broken" => Ok(Status::Broken),
            "passed" => Ok(Status::Passed),
            "skipped" => Ok(Status::Skipped),
            _ => Err(format!("Status '{}' not supported", s)),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Status::Failed => "failed",
            Status::Broken => "broken",
            Status::Passed => "passed",
            Status::Skipped => "skipped",
            Status::Unknown => "unknown",
        };
        f.write_str(name)
    }
}
