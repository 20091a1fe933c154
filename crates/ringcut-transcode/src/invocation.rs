use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::config::TranscodeProfile;

/// A fully-resolved transcoder command line.
///
/// Argument order is fixed: global flags, the trim window (input seeking),
/// the input, the encoder profile, the optional fade filter, and finally the
/// output path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<OsString>,
}

impl Invocation {
    pub fn build(
        program: &Path,
        profile: &TranscodeProfile,
        start: f64,
        duration: f64,
        fade: bool,
        input: &Path,
        output: &Path,
    ) -> Self {
        // Overwrite without prompting; never read stdin.
        let mut args: Vec<OsString> = vec!["-y".into(), "-nostdin".into()];
        flag(&mut args, "-ss", format!("{start:.2}"));
        flag(&mut args, "-t", format!("{duration:.2}"));
        flag(&mut args, "-i", input);
        flag(&mut args, "-c:a", &profile.audio_codec);
        flag(&mut args, "-c:v", &profile.video_codec);
        flag(&mut args, "-f", &profile.format);
        flag(&mut args, "-b:a", &profile.audio_bitrate);
        if fade {
            flag(&mut args, "-af", &profile.fade_filter);
        }
        args.push(output.as_os_str().to_owned());

        Self {
            program: program.to_path_buf(),
            args,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Shell-like rendering for logs.
    pub fn display(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }

    pub(crate) fn command(&self) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

fn flag(args: &mut Vec<OsString>, name: &str, value: impl AsRef<OsStr>) {
    args.push(name.into());
    args.push(value.as_ref().to_owned());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(inv: &Invocation) -> Vec<String> {
        inv.args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn build(start: f64, duration: f64, fade: bool) -> Invocation {
        Invocation::build(
            Path::new("ffmpeg"),
            &TranscodeProfile::default(),
            start,
            duration,
            fade,
            Path::new("/store/abc.mp3"),
            Path::new("/scratch/out.m4r"),
        )
    }

    #[test]
    fn fixed_template_without_fade() {
        let inv = build(0.0, 2.0, false);
        assert_eq!(inv.program(), Path::new("ffmpeg"));
        assert_eq!(
            args(&inv),
            [
                "-y", "-nostdin", "-ss", "0.00", "-t", "2.00", "-i", "/store/abc.mp3", "-c:a",
                "libfdk_aac", "-c:v", "copy", "-f", "ipod", "-b:a", "96k", "/scratch/out.m4r",
            ]
        );
    }

    #[test]
    fn fade_goes_right_before_output() {
        let inv = build(1.0, 30.0, true);
        let a = args(&inv);
        let n = a.len();
        assert_eq!(a[n - 3], "-af");
        assert_eq!(a[n - 2], "afade=t=in:ss=0:d=1.5");
        assert_eq!(a[n - 1], "/scratch/out.m4r");
    }

    #[test]
    fn seconds_use_two_decimals() {
        let a = args(&build(12.345, 0.5, false));
        assert_eq!(a[3], "12.35");
        assert_eq!(a[5], "0.50");
    }

    #[test]
    fn out_of_range_values_are_passed_through() {
        let a = args(&build(0.0, -1.0, false));
        assert_eq!(a[5], "-1.00");
    }

    #[test]
    fn display_joins_program_and_args() {
        let line = build(0.0, 2.0, false).display();
        assert!(line.starts_with("ffmpeg -y -nostdin -ss 0.00 -t 2.00 -i /store/abc.mp3"));
        assert!(line.ends_with("/scratch/out.m4r"));
    }
}
