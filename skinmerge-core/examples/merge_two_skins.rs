use skinmerge::{Bitmap, MergeSession, Settings, Slot, write_png};

// Builds a checkerboard base and a striped overlay in memory, merges them with auto-resize and
// writes the result under `target/`. Run with `RUST_LOG=debug` to see the
// compositor's decisions.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut base = Vec::with_capacity(64 * 64 * 4);
    for y in 0..64u32 {
        for x in 0..64u32 {
            let c = if (x / 8 + y / 8) % 2 == 0 { 40 } else { 200 };
            base.extend_from_slice(&[c, c, c, 255]);
        }
    }
    let mut overlay = Vec::with_capacity(32 * 32 * 4);
    for _y in 0..32u32 {
        for x in 0..32u32 {
            let a = if x % 4 == 0 { 255 } else { 0 };
            overlay.extend_from_slice(&[220, 30, 30, a]);
        }
    }

    let mut settings = Settings::default();
    settings.merge.auto_resize = true;
    let mut session = MergeSession::new(&settings)?;

    let ticket = session.begin_load(Slot::Base);
    session.finish_load(ticket, Bitmap::from_rgba8(64, 64, base), Some("demo.png"))?;
    let ticket = session.begin_load(Slot::Overlay);
    session.finish_load(ticket, Bitmap::from_rgba8(32, 32, overlay), None)?;

    let merged = session.composite()?;
    let out = std::path::Path::new("target").join(session.output_file_name());
    write_png(&out, &merged)?;
    println!("wrote {}", out.display());
    Ok(())
}
