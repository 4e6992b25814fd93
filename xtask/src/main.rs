/// The xtask binary delegates entirely to nih_plug_xtask, which provides
/// the `bundle` subcommand. Usage:
///
///   cargo xtask bundle memory-pad --release
///
/// This compiles the plugin as a cdylib and packages it into
/// `target/bundled/Memory Pad.vst3` and `Memory Pad.clap`.
fn main() -> nih_plug_xtask::Result<()> {
    nih_plug_xtask::main()
}
