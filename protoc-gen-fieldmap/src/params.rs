//! Plugin parameter parsing
//!
//! protoc passes everything before the `:` of `--fieldmap_out` as one string
//! of comma separated `key=value` pairs:
//!
//! ```text
//! mode=convert,from=api.GetUser,to=client.GetUserRequest,map=Name=User.Name!,optional=Trace
//! ```
//!
//! A trailing `!` on a `map` source marks the entry as an override.

use std::str::FromStr;

use fieldmap_codegen::casing::camel_to_snake;
use fieldmap_codegen::{FieldMap, FieldMapperEntry};

use crate::error::PluginError;

/// Which generator the plugin runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Struct-to-struct conversion
    #[default]
    Convert,
    /// Header values into string fields
    Populate,
    /// Header values into typed fields
    Propagate,
}

impl Mode {
    fn as_str(self) -> &'static str {
        match self {
            Mode::Convert => "convert",
            Mode::Populate => "populate",
            Mode::Propagate => "propagate",
        }
    }
}

impl FromStr for Mode {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "convert" => Ok(Mode::Convert),
            "populate" => Ok(Mode::Populate),
            "propagate" => Ok(Mode::Propagate),
            other => Err(PluginError::Parameter(format!("unknown mode `{other}`"))),
        }
    }
}

/// Parsed plugin parameters
#[derive(Debug, Default)]
pub struct Params {
    /// Generator to run
    pub mode: Mode,
    /// Source message, convert mode only
    pub from: Option<String>,
    /// Target message
    pub to: Option<String>,
    /// Renames and overrides; in header modes the source is a header name
    pub field_map: FieldMap,
    /// Target paths allowed to stay unset
    pub optional: FieldMap,
    /// Output file name
    pub out: Option<String>,
}

impl Params {
    /// Parse a protoc parameter string
    pub fn parse(param: &str) -> Result<Self, PluginError> {
        let mut params = Params::default();
        for part in param.split(',').map(str::trim).filter(|part| !part.is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| PluginError::Parameter(format!("expected key=value, got `{part}`")))?;
            match key {
                "mode" => params.mode = value.parse()?,
                "from" => params.from = Some(value.to_string()),
                "to" => params.to = Some(value.to_string()),
                "out" => params.out = Some(value.to_string()),
                "map" => {
                    let (target, source) = value
                        .split_once('=')
                        .ok_or_else(|| PluginError::Parameter(format!("expected map=Target=Source, got `{part}`")))?;
                    let entry = match source.strip_suffix('!') {
                        Some(source) => FieldMapperEntry::new(source, true),
                        None => FieldMapperEntry::new(source, false),
                    };
                    params.field_map.insert(target.to_string(), entry);
                }
                "optional" => {
                    params
                        .optional
                        .insert(value.to_string(), FieldMapperEntry::new(value, false));
                }
                other => return Err(PluginError::Parameter(format!("unknown key `{other}`"))),
            }
        }
        Ok(params)
    }

    /// The source message, required in convert mode
    pub fn from(&self) -> Result<&str, PluginError> {
        self.from
            .as_deref()
            .ok_or_else(|| PluginError::Parameter("missing `from`".to_string()))
    }

    /// The target message
    pub fn to(&self) -> Result<&str, PluginError> {
        self.to
            .as_deref()
            .ok_or_else(|| PluginError::Parameter("missing `to`".to_string()))
    }

    /// `out`, or `<snake_case(to)>_<mode>.go.txt`
    pub fn output_name(&self) -> Result<String, PluginError> {
        if let Some(out) = &self.out {
            return Ok(out.clone());
        }
        let to = self.to()?;
        let message = to.rsplit('.').next().unwrap_or(to);
        Ok(format!("{}_{}.go.txt", camel_to_snake(message), self.mode.as_str()))
    }
}
