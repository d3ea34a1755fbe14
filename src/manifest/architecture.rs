use super::types::Architecture;

/// Guess an installer's architecture from its download URL.
///
/// The URL is split into alphanumeric tokens and scanned from the end, so the
/// file name wins over directory names. Returns `None` when no token names an
/// architecture.
pub fn find_architecture(url: &str) -> Option<Architecture> {
    let normalized = url
        .to_ascii_lowercase()
        .replace("x86_64", "x64")
        .replace("x86-64", "x64");

    normalized
        .split(|c: char| !c.is_ascii_alphanumeric())
        .rev()
        .find_map(token_architecture)
}

fn token_architecture(token: &str) -> Option<Architecture> {
    match token {
        "x64" | "amd64" | "win64" => Some(Architecture::X64),
        "arm64" | "aarch64" => Some(Architecture::Arm64),
        "x86" | "i386" | "i686" | "win32" => Some(Architecture::X86),
        "arm" | "armv7" => Some(Architecture::Arm),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_tokens() {
        assert_eq!(
            find_architecture("https://example.com/app-1.0-x64.msi"),
            Some(Architecture::X64)
        );
        assert_eq!(
            find_architecture("https://example.com/app_win32_setup.exe"),
            Some(Architecture::X86)
        );
        assert_eq!(
            find_architecture("https://example.com/app.aarch64.zip"),
            Some(Architecture::Arm64)
        );
        assert_eq!(
            find_architecture("https://example.com/App-ARMv7.appx"),
            Some(Architecture::Arm)
        );
    }

    #[test]
    fn test_x86_64_is_x64() {
        assert_eq!(
            find_architecture("https://example.com/tool-x86_64-pc-windows.zip"),
            Some(Architecture::X64)
        );
        assert_eq!(
            find_architecture("https://example.com/tool-X86-64.exe"),
            Some(Architecture::X64)
        );
    }

    #[test]
    fn test_file_name_wins_over_directory() {
        assert_eq!(
            find_architecture("https://example.com/x86/app-arm64.msix"),
            Some(Architecture::Arm64)
        );
    }

    #[test]
    fn test_tokens_must_be_delimited() {
        assert_eq!(find_architecture("https://example.com/xarm/harmony.exe"), None);
        assert_eq!(find_architecture("https://example.com/setup.exe"), None);
    }
}
