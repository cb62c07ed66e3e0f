//! Parser Module
//!
//! calamineを使用したワークブック読み込み。
//! 各シートの先頭行をヘッダーとして、データ行を`Record`の列に変換します。

mod workbook;

pub use workbook::WorkbookParser;
