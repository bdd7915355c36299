use std::str::FromStr;

/// Spatial size the classifier was trained on.
pub const DEFAULT_INPUT_SIZE: (u32, u32) = (224, 224);

/// Channel order of the tensor handed to the model.
///
/// The classifier was trained on images decoded in BGR order, so that is
/// the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    Rgb,
    #[default]
    Bgr,
}

impl ChannelOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelOrder::Rgb => "rgb",
            ChannelOrder::Bgr => "bgr",
        }
    }
}

impl FromStr for ChannelOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rgb" => Ok(ChannelOrder::Rgb),
            "bgr" => Ok(ChannelOrder::Bgr),
            other => Err(format!(
                "{} is not a supported channel order. Use either `rgb` or `bgr`.",
                other
            )),
        }
    }
}
