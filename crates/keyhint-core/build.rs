use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("virtual_keys.rs");
    let mut f = File::create(&dest_path).unwrap();

    // Generate the VirtualKey newtype wrapper
    writeln!(
        f,
        r#"
/// A virtual key code from the fixed virtual-key table.
///
/// Newtype around u16 so codes from the OS boundary cannot be confused
/// with evdev scan codes. Values follow the Windows `VK_*` numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct VirtualKey(pub u16);

impl VirtualKey {{
    /// Get the raw numeric code value
    pub const fn code(self) -> u16 {{
        self.0
    }}

    /// Display name used in the event log (`VK_0x..` for unmapped codes)
    pub fn name(self) -> String {{
        key_name(self)
    }}
}}

impl From<u16> for VirtualKey {{
    fn from(code: u16) -> Self {{
        VirtualKey(code)
    }}
}}

impl From<VirtualKey> for u16 {{
    fn from(key: VirtualKey) -> Self {{
        key.0
    }}
}}

impl fmt::Display for VirtualKey {{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {{
        write!(f, "{{}}", self.name())
    }}
}}

impl FromStr for VirtualKey {{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {{
        key_from_name(s).ok_or_else(|| format!("Unknown key: {{}}", s))
    }}
}}
"#
    )
    .unwrap();

    println!("cargo:rerun-if-changed=build.rs");
}
