//! ZFP command definitions

use std::fmt;

use crate::error::{Error, Result};

/// Protocol commands
///
/// Several operations share a command byte on the wire and are told apart
/// by their payload (for example [`Command::SetPayType`] and
/// [`Command::SetHeaderLine`] are both `0x44`). Decoding a byte always
/// yields the first variant listed for it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    // Information
    GetStatus,
    GetVersion,
    Diagnostic,

    // External display
    DisplayClear,
    DisplayLine1,
    DisplayLine2,
    Display,
    DisplayDateTime,

    // Printer mechanics
    PaperCut,
    OpenTill,
    LineFeed,

    // Receipts
    OpenNonFiscalReceipt,
    CloseNonFiscalReceipt,
    OpenFiscalReceipt,
    SellFree,
    SellFromDatabase,
    Subtotal,
    Payment,
    PayVat,
    PrintText,
    CloseFiscalReceipt,
    PrintDuplicate,
    OfficialSums,

    // Service and setup
    SetSerialNumber,
    SetTaxNumber,
    MakeFiscal,
    SetTaxPercents,
    SetDecimalPoint,
    SetPayType,
    SetHeaderLine,
    SetParameters,
    SetDateTime,
    SetOperator,
    SetArticle,
    SetLogo,

    // Queries
    GetSerialNumbers,
    GetTaxNumber,
    GetTaxPercents,
    GetDecimalPoint,
    GetReceiptNumber,
    GetPayTypes,
    GetParameters,
    GetDateTime,
    GetHeaderLine,
    GetOperatorInfo,
    GetArticleInfo,
    PrintLogo,
    GetDailySums,
    GetReceiptInfo,
    GetFreeFiscalSpace,

    // Reports
    ReportSpecialFiscal,
    ReportFiscalByBlockDetailed,
    ReportFiscalByBlockBrief,
    ReportFiscalByDateDetailed,
    ReportFiscalByDateBrief,
    ReportDaily,
    ReportOperator,
    ReportArticles,
    ReportDailyExtended,
    SetExternalDisplay,
}

impl Command {
    /// Command byte on the wire
    pub fn code(self) -> u8 {
        match self {
            Self::GetStatus => 0x20,
            Self::GetVersion => 0x21,
            Self::Diagnostic => 0x22,
            Self::DisplayClear => 0x24,
            Self::DisplayLine1 => 0x25,
            Self::DisplayLine2 => 0x26,
            Self::Display => 0x27,
            Self::DisplayDateTime => 0x28,
            Self::PaperCut => 0x29,
            Self::OpenTill => 0x2A,
            Self::LineFeed => 0x2B,
            Self::OpenNonFiscalReceipt => 0x2E,
            Self::CloseNonFiscalReceipt => 0x2F,
            Self::OpenFiscalReceipt => 0x30,
            Self::SellFree => 0x31,
            Self::SellFromDatabase => 0x32,
            Self::Subtotal => 0x33,
            Self::Payment => 0x35,
            Self::PayVat => 0x36,
            Self::PrintText => 0x37,
            Self::CloseFiscalReceipt => 0x38,
            Self::PrintDuplicate => 0x3A,
            Self::OfficialSums => 0x3B,
            Self::SetSerialNumber => 0x40,
            Self::SetTaxNumber | Self::MakeFiscal => 0x41,
            Self::SetTaxPercents => 0x42,
            Self::SetDecimalPoint => 0x43,
            Self::SetPayType | Self::SetHeaderLine => 0x44,
            Self::SetParameters => 0x45,
            Self::SetDateTime => 0x48,
            Self::SetOperator => 0x4A,
            Self::SetArticle => 0x4B,
            Self::SetLogo => 0x4C,
            Self::GetSerialNumbers => 0x60,
            Self::GetTaxNumber => 0x61,
            Self::GetTaxPercents => 0x62,
            Self::GetDecimalPoint | Self::GetReceiptNumber => 0x63,
            Self::GetPayTypes => 0x64,
            Self::GetParameters => 0x65,
            Self::GetDateTime => 0x68,
            Self::GetHeaderLine => 0x69,
            Self::GetOperatorInfo => 0x6A,
            Self::GetArticleInfo => 0x6B,
            Self::PrintLogo => 0x6C,
            Self::GetDailySums => 0x6D,
            Self::GetReceiptInfo => 0x72,
            Self::GetFreeFiscalSpace => 0x74,
            Self::ReportSpecialFiscal => 0x77,
            Self::ReportFiscalByBlockDetailed => 0x78,
            Self::ReportFiscalByBlockBrief => 0x79,
            Self::ReportFiscalByDateDetailed => 0x7A,
            Self::ReportFiscalByDateBrief => 0x7B,
            Self::ReportDaily => 0x7C,
            Self::ReportOperator => 0x7D,
            Self::ReportArticles | Self::SetExternalDisplay => 0x7E,
            Self::ReportDailyExtended => 0x7F,
        }
    }

    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::GetStatus => "GET_STATUS",
            Self::GetVersion => "GET_VERSION",
            Self::Diagnostic => "DIAGNOSTIC",
            Self::DisplayClear => "DISPLAY_CLEAR",
            Self::DisplayLine1 => "DISPLAY_LINE1",
            Self::DisplayLine2 => "DISPLAY_LINE2",
            Self::Display => "DISPLAY",
            Self::DisplayDateTime => "DISPLAY_DATETIME",
            Self::PaperCut => "PAPER_CUT",
            Self::OpenTill => "OPEN_TILL",
            Self::LineFeed => "LINE_FEED",
            Self::OpenNonFiscalReceipt => "OPEN_BON",
            Self::CloseNonFiscalReceipt => "CLOSE_BON",
            Self::OpenFiscalReceipt => "OPEN_FISCAL_BON",
            Self::SellFree => "SELL_FREE",
            Self::SellFromDatabase => "SELL_DB",
            Self::Subtotal => "SUBTOTAL",
            Self::Payment => "PAYMENT",
            Self::PayVat => "PAY_VAT",
            Self::PrintText => "PRINT_TEXT",
            Self::CloseFiscalReceipt => "CLOSE_FISCAL_BON",
            Self::PrintDuplicate => "PRINT_DUPLICATE",
            Self::OfficialSums => "OFFICIAL_SUMS",
            Self::SetSerialNumber => "SET_SERIAL_NUMBER",
            Self::SetTaxNumber => "SET_TAX_NUMBER",
            Self::MakeFiscal => "MAKE_FISCAL",
            Self::SetTaxPercents => "SET_TAX_PERCENTS",
            Self::SetDecimalPoint => "SET_DECIMAL_POINT",
            Self::SetPayType => "SET_PAY_TYPE",
            Self::SetHeaderLine => "SET_HEADER_LINE",
            Self::SetParameters => "SET_PARAMETERS",
            Self::SetDateTime => "SET_DATETIME",
            Self::SetOperator => "SET_OPERATOR",
            Self::SetArticle => "SET_ARTICLE",
            Self::SetLogo => "SET_LOGO",
            Self::GetSerialNumbers => "GET_SERIAL_NUMBERS",
            Self::GetTaxNumber => "GET_TAX_NUMBER",
            Self::GetTaxPercents => "GET_TAX_PERCENTS",
            Self::GetDecimalPoint => "GET_DECIMAL_POINT",
            Self::GetReceiptNumber => "GET_BON_NUMBER",
            Self::GetPayTypes => "GET_PAY_TYPES",
            Self::GetParameters => "GET_PARAMETERS",
            Self::GetDateTime => "GET_DATETIME",
            Self::GetHeaderLine => "GET_HEADER_LINE",
            Self::GetOperatorInfo => "GET_OPERATOR_INFO",
            Self::GetArticleInfo => "GET_ARTICLE_INFO",
            Self::PrintLogo => "PRINT_LOGO",
            Self::GetDailySums => "GET_DAILY_SUMS",
            Self::GetReceiptInfo => "GET_RECEIPT_INFO",
            Self::GetFreeFiscalSpace => "GET_FREE_FISCAL_SPACE",
            Self::ReportSpecialFiscal => "REPORT_SPECIAL_FISCAL",
            Self::ReportFiscalByBlockDetailed => "REPORT_FISCAL_BLOCK_DETAILED",
            Self::ReportFiscalByBlockBrief => "REPORT_FISCAL_BLOCK_BRIEF",
            Self::ReportFiscalByDateDetailed => "REPORT_FISCAL_DATE_DETAILED",
            Self::ReportFiscalByDateBrief => "REPORT_FISCAL_DATE_BRIEF",
            Self::ReportDaily => "REPORT_DAILY",
            Self::ReportOperator => "REPORT_OPERATOR",
            Self::ReportArticles => "REPORT_ARTICLES",
            Self::ReportDailyExtended => "REPORT_DAILY_EXTENDED",
            Self::SetExternalDisplay => "SET_EXTERNAL_DISPLAY",
        }
    }

    /// Commands that only read device state
    pub fn is_query(self) -> bool {
        matches!(
            self,
            Self::GetStatus
                | Self::GetVersion
                | Self::GetSerialNumbers
                | Self::GetTaxNumber
                | Self::GetTaxPercents
                | Self::GetDecimalPoint
                | Self::GetReceiptNumber
                | Self::GetPayTypes
                | Self::GetParameters
                | Self::GetDateTime
                | Self::GetHeaderLine
                | Self::GetOperatorInfo
                | Self::GetArticleInfo
                | Self::GetDailySums
                | Self::GetReceiptInfo
                | Self::GetFreeFiscalSpace
        )
    }
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> u8 {
        cmd.code()
    }
}

impl TryFrom<u8> for Command {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x20 => Ok(Self::GetStatus),
            0x21 => Ok(Self::GetVersion),
            0x22 => Ok(Self::Diagnostic),
            0x24 => Ok(Self::DisplayClear),
            0x25 => Ok(Self::DisplayLine1),
            0x26 => Ok(Self::DisplayLine2),
            0x27 => Ok(Self::Display),
            0x28 => Ok(Self::DisplayDateTime),
            0x29 => Ok(Self::PaperCut),
            0x2A => Ok(Self::OpenTill),
            0x2B => Ok(Self::LineFeed),
            0x2E => Ok(Self::OpenNonFiscalReceipt),
            0x2F => Ok(Self::CloseNonFiscalReceipt),
            0x30 => Ok(Self::OpenFiscalReceipt),
            0x31 => Ok(Self::SellFree),
            0x32 => Ok(Self::SellFromDatabase),
            0x33 => Ok(Self::Subtotal),
            0x35 => Ok(Self::Payment),
            0x36 => Ok(Self::PayVat),
            0x37 => Ok(Self::PrintText),
            0x38 => Ok(Self::CloseFiscalReceipt),
            0x3A => Ok(Self::PrintDuplicate),
            0x3B => Ok(Self::OfficialSums),
            0x40 => Ok(Self::SetSerialNumber),
            0x41 => Ok(Self::SetTaxNumber),
            0x42 => Ok(Self::SetTaxPercents),
            0x43 => Ok(Self::SetDecimalPoint),
            0x44 => Ok(Self::SetPayType),
            0x45 => Ok(Self::SetParameters),
            0x48 => Ok(Self::SetDateTime),
            0x4A => Ok(Self::SetOperator),
            0x4B => Ok(Self::SetArticle),
            0x4C => Ok(Self::SetLogo),
            0x60 => Ok(Self::GetSerialNumbers),
            0x61 => Ok(Self::GetTaxNumber),
            0x62 => Ok(Self::GetTaxPercents),
            0x63 => Ok(Self::GetDecimalPoint),
            0x64 => Ok(Self::GetPayTypes),
            0x65 => Ok(Self::GetParameters),
            0x68 => Ok(Self::GetDateTime),
            0x69 => Ok(Self::GetHeaderLine),
            0x6A => Ok(Self::GetOperatorInfo),
            0x6B => Ok(Self::GetArticleInfo),
            0x6C => Ok(Self::PrintLogo),
            0x6D => Ok(Self::GetDailySums),
            0x72 => Ok(Self::GetReceiptInfo),
            0x74 => Ok(Self::GetFreeFiscalSpace),
            0x77 => Ok(Self::ReportSpecialFiscal),
            0x78 => Ok(Self::ReportFiscalByBlockDetailed),
            0x79 => Ok(Self::ReportFiscalByBlockBrief),
            0x7A => Ok(Self::ReportFiscalByDateDetailed),
            0x7B => Ok(Self::ReportFiscalByDateBrief),
            0x7C => Ok(Self::ReportDaily),
            0x7D => Ok(Self::ReportOperator),
            0x7E => Ok(Self::ReportArticles),
            0x7F => Ok(Self::ReportDailyExtended),
            _ => Err(Error::UnknownCommand(value)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), self.code())
    }
}
