//! Security Module
//!
//! 入力ワークブックのサイズ制限と、出力パックのエントリパス検証を提供するモジュール。
//! ロスター名はワークブックの自由記述から作られるため、書き込み前に必ずパスを検証します。

/// セキュリティ設定
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// 入力ワークブックの最大サイズ（バイト）
    /// デフォルト: 256MB
    pub max_input_file_size: u64,
    /// 1回の変換で書き出す最大ファイル数
    /// デフォルト: 10000
    pub max_output_files: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_file_size: 268_435_456, // 256MB
            max_output_files: 10_000,
        }
    }
}

/// 出力パック内のエントリパスを検証する
///
/// ディレクトリ出力とZIP出力の両方で、出力ルートの外に書き込まないことを保証します。
///
/// # 戻り値
///
/// * `Ok(())` - パスが安全な場合
/// * `Err(String)` - 空、絶対パス、`..`要素、バックスラッシュを含む場合
pub fn validate_pack_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("Empty path is not allowed".to_string());
    }

    // `/etc/x`や`C:/x`、`C:\x`形式
    let bytes = path.as_bytes();
    let has_drive = bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
    if path.starts_with('/') || has_drive {
        return Err(format!("Absolute path is not allowed: {}", path));
    }

    if path.contains('\\') {
        return Err(format!("Backslash in path is not allowed: {}", path));
    }

    // `lt.._surge`のようなファイル名は許可し、要素としての`..`と`.`のみ拒否
    if path.split('/').any(|part| part == ".." || part == ".") {
        return Err(format!("Path traversal detected: {}", path));
    }

    if path.split('/').any(str::is_empty) {
        return Err(format!("Empty path component is not allowed: {}", path));
    }

    Ok(())
}
