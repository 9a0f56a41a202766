//! Host triple detection
//!
//! Maps the raw `uname -s` / `uname -m` answers onto the triple LLVM would
//! use, for the subset of hosts that have seed toolchains.

use crate::error::{Stage0Error, Stage0Result};
use std::fmt;
use std::io::ErrorKind;
use std::process::{Command, Stdio};
use tracing::debug;

/// Triple used when `uname` is missing on a Windows host
const WINDOWS_MSVC: &str = "x86_64-pc-windows-msvc";

/// Canonical `<cpu>-<vendor>-<os>[-abi]` identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetTriple(String);

impl TargetTriple {
    pub fn new(triple: impl Into<String>) -> Self {
        Self(triple.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw platform facts the resolver depends on
pub trait PlatformProbe {
    /// Kernel name as `uname -s` prints it. `None` when there is no `uname`
    /// on a Windows host.
    fn kernel_name(&self) -> Stage0Result<Option<String>>;

    /// Machine name as `uname -m` prints it
    fn machine(&self) -> Stage0Result<String>;

    /// Value of `$MSYSTEM`, set by MSYS2 shells
    fn msystem(&self) -> Option<String>;

    /// Whether the CPU supports x86_64 (`sysctl hw.optional.x86_64`)
    fn has_x86_64(&self) -> Stage0Result<bool>;
}

/// Probe backed by `uname` and `sysctl`
#[derive(Debug, Default)]
pub struct UnameProbe;

impl UnameProbe {
    fn capture(program: &str, args: &[&str]) -> Result<String, std::io::Error> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl PlatformProbe for UnameProbe {
    fn kernel_name(&self) -> Stage0Result<Option<String>> {
        match Self::capture("uname", &["-s"]) {
            Ok(name) => Ok(Some(name)),
            Err(e) if e.kind() == ErrorKind::NotFound && cfg!(windows) => Ok(None),
            Err(e) => Err(Stage0Error::command_failed("uname -s", e)),
        }
    }

    fn machine(&self) -> Stage0Result<String> {
        Self::capture("uname", &["-m"]).map_err(|e| Stage0Error::command_failed("uname -m", e))
    }

    fn msystem(&self) -> Option<String> {
        std::env::var("MSYSTEM").ok()
    }

    fn has_x86_64(&self) -> Stage0Result<bool> {
        let output = Self::capture("sysctl", &["hw.optional.x86_64"])
            .map_err(|e| Stage0Error::command_failed("sysctl hw.optional.x86_64", e))?;
        Ok(output.contains(": 1"))
    }
}

/// Resolve the host triple from `probe`
pub fn detect(probe: &dyn PlatformProbe) -> Stage0Result<TargetTriple> {
    let Some(kernel) = probe.kernel_name()? else {
        debug!("uname not available, assuming {}", WINDOWS_MSVC);
        return Ok(TargetTriple::new(WINDOWS_MSVC));
    };
    let mut cpu = probe.machine()?;
    debug!("Host probes: kernel={} machine={}", kernel, cpu);

    // Darwin reports i686 on 64-bit hardware in some configurations
    if kernel == "Darwin" && cpu == "i686" && probe.has_x86_64()? {
        cpu = "x86_64".to_string();
    }

    let os = os_type(&kernel, probe.msystem().as_deref())?;
    if let Some(forced) = os.cpu {
        cpu = forced.to_string();
    }
    let cpu = cpu_type(&cpu)?;

    let mut triple = format!("{}-{}", cpu.name, os.suffix);
    if cpu.hard_float {
        triple.push_str("eabihf");
    }
    Ok(TargetTriple::new(triple))
}

struct OsType {
    suffix: &'static str,
    /// Windows emulation layers report their own CPU, not the toolchain's
    cpu: Option<&'static str>,
}

fn os_type(kernel: &str, msystem: Option<&str>) -> Stage0Result<OsType> {
    let plain = |suffix: &'static str| -> Stage0Result<OsType> {
        Ok(OsType { suffix, cpu: None })
    };

    match kernel {
        "Linux" => plain("unknown-linux-gnu"),
        "FreeBSD" => plain("unknown-freebsd"),
        "DragonFly" => plain("unknown-dragonfly"),
        "Bitrig" => plain("unknown-bitrig"),
        "OpenBSD" => plain("unknown-openbsd"),
        "NetBSD" => plain("unknown-netbsd"),
        "Darwin" => plain("apple-darwin"),
        // msys1 is always i686 and msys2 always x86_64 according to uname -m;
        // $MSYSTEM tells which gcc is actually in use
        k if k.starts_with("MINGW") => Ok(OsType {
            suffix: "pc-windows-gnu",
            cpu: Some(if msystem == Some("MINGW64") {
                "x86_64"
            } else {
                "i686"
            }),
        }),
        k if k.starts_with("MSYS") => plain("pc-windows-gnu"),
        k if k.starts_with("CYGWIN_NT") => Ok(OsType {
            suffix: "pc-windows-gnu",
            cpu: Some(if k.ends_with("WOW64") { "x86_64" } else { "i686" }),
        }),
        other => Err(Stage0Error::UnsupportedPlatform {
            probe: "OS type",
            value: other.to_string(),
        }),
    }
}

struct CpuType {
    name: &'static str,
    hard_float: bool,
}

fn cpu_type(machine: &str) -> Stage0Result<CpuType> {
    let name = match machine {
        "i386" | "i486" | "i686" | "i786" | "x86" => "i686",
        "xscale" | "arm" => "arm",
        "armv7l" => {
            return Ok(CpuType {
                name: "arm",
                hard_float: true,
            })
        }
        "aarch64" => "aarch64",
        "powerpc" | "ppc" | "ppc64" => "powerpc",
        "amd64" | "x86_64" | "x86-64" | "x64" => "x86_64",
        other => {
            return Err(Stage0Error::UnsupportedPlatform {
                probe: "cpu type",
                value: other.to_string(),
            })
        }
    };
    Ok(CpuType {
        name,
        hard_float: false,
    })
}
