//! Failure event reports raised towards O&M (3GPP TS 12.21 9.4.16, 9.4.43)

use core::fmt;

use gsm_core::LchanId;

/// Event type of a failure report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EventType {
    Communication = 0x00,
    QualityOfService = 0x01,
    ProcessingFailure = 0x02,
    Equipment = 0x03,
    Environmental = 0x04,
}

/// Perceived severity of a failure report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Severity {
    Failure = 0x00,
    Critical = 0x01,
    Major = 0x02,
    Minor = 0x03,
    Warning = 0x04,
    Indeterminate = 0x05,
}

/// Failure events the L1SAP raises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmKind {
    /// Upward primitive with a tag the L1SAP does not handle
    RxUnknL1sapUpMsg,
    /// PHY refused a downward primitive as unsupported
    RxUnknL1sapDownMsg,
}

impl AlarmKind {
    pub fn event_type(self) -> EventType {
        EventType::ProcessingFailure
    }

    pub fn severity(self) -> Severity {
        Severity::Major
    }

    /// Probable cause value, manufacturer-dependent range
    pub fn cause(self) -> u16 {
        match self {
            AlarmKind::RxUnknL1sapDownMsg => 0x3003,
            AlarmKind::RxUnknL1sapUpMsg => 0x3004,
        }
    }
}

impl fmt::Display for AlarmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlarmKind::RxUnknL1sapUpMsg => write!(f, "unknown L1SAP up message"),
            AlarmKind::RxUnknL1sapDownMsg => write!(f, "unknown L1SAP down message"),
        }
    }
}

/// One failure event report with its context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmReport {
    pub kind: AlarmKind,
    pub cause: u16,
    pub trx: Option<u8>,
    pub lchan: Option<LchanId>,
    pub text: Option<String>,
}

impl AlarmReport {
    pub fn new(kind: AlarmKind) -> Self {
        AlarmReport { kind, cause: kind.cause(), trx: None, lchan: None, text: None }
    }

    pub fn with_trx(mut self, trx: u8) -> Self {
        self.trx = Some(trx);
        self
    }

    pub fn with_text(mut self, text: String) -> Self {
        self.text = Some(text);
        self
    }
}

impl fmt::Display for AlarmReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} cause=0x{:04x}", self.kind, self.cause)?;
        if let Some(trx) = self.trx {
            write!(f, " trx={}", trx)?;
        }
        if let Some(lchan) = &self.lchan {
            write!(f, " lchan={}", lchan)?;
        }
        if let Some(text) = &self.text {
            write!(f, ": {}", text)?;
        }
        Ok(())
    }
}
