use serde::{Deserialize, Serialize};

use crate::Candle;

/// Whether a historical data source satisfied a request completely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResponseType {
    /// Every requested candle was delivered.
    #[default]
    FullResponse,
    /// The source ran out of data or hit a limit before satisfying the request.
    PartialResponse,
}

impl ResponseType {
    /// True for [`ResponseType::FullResponse`].
    #[must_use]
    pub const fn is_full(self) -> bool {
        matches!(self, Self::FullResponse)
    }
}

/// One item of a historical candle stream: a candle, or the closing
/// completeness marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StreamItem {
    /// The next candle in chronological order.
    Candle(Candle),
    /// Terminal marker; nothing after it is read.
    End(ResponseType),
}

impl From<Candle> for StreamItem {
    fn from(c: Candle) -> Self {
        Self::Candle(c)
    }
}

impl From<ResponseType> for StreamItem {
    fn from(r: ResponseType) -> Self {
        Self::End(r)
    }
}
