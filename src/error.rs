use thiserror::Error;

pub type ZaikoResult<T> = Result<T, ZaikoError>;

#[derive(Error, Debug)]
pub enum ZaikoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("入力ファイルの読み込みに失敗しました: {0}")]
    Workbook(String),

    #[error("保存に失敗しました: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    #[error("出力用にテンプレートを読み込めませんでした: {0}")]
    Template(String),

    #[error("日付形式が無効です。YYYY-MM-DD または YYYY/MM/DD 形式で入力してください。（{0}）")]
    InvalidDate(String),

    #[error("シート『{0}』が見つかりません。")]
    SheetNotFound(String),

    #[error("出力先シート『{boxed}』『{small}』が見つかりません。")]
    OutputSheetsNotFound { boxed: String, small: String },

    #[error("在庫集計表の{row}行目に {date} が見つかりません。")]
    DateNotFound { row: u32, date: String },

    #[error("{date} の本残列が見つかりません。（{cell}='{found}'）")]
    StockColumnMismatch {
        date: String,
        cell: String,
        found: String,
    },

    #[error("{0}は集計対象外です。")]
    UnsupportedWeekday(String),

    #[error("Layout error: {0}")]
    Config(String),
}

impl From<calamine::XlsxError> for ZaikoError {
    fn from(err: calamine::XlsxError) -> Self {
        ZaikoError::Workbook(err.to_string())
    }
}

impl From<zip::result::ZipError> for ZaikoError {
    fn from(err: zip::result::ZipError) -> Self {
        ZaikoError::Template(err.to_string())
    }
}

impl From<quick_xml::Error> for ZaikoError {
    fn from(err: quick_xml::Error) -> Self {
        ZaikoError::Template(err.to_string())
    }
}
