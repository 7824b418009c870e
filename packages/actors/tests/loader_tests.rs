use std::error::Error;

use actors::{FsLoader, ResourceLoader};

#[tokio::test]
async fn fs_loader_reads_text_and_base64() -> Result<(), Box<dyn Error>> {
    let dir = std::env::temp_dir().join(format!("sched-loader-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    std::fs::write(dir.join("main.ext"), "entry point")?;
    std::fs::write(dir.join("pkg.pack"), b"hello")?;

    let loader = FsLoader::new(&dir);
    assert_eq!(loader.read_text("main.ext").await?, "entry point");
    assert_eq!(loader.read_binary_as_base64("pkg.pack").await?, "aGVsbG8=");

    // file:// identifiers resolve to the same path.
    let uri = format!("file://{}", dir.join("main.ext").display());
    assert_eq!(loader.read_text(&uri).await?, "entry point");

    let error = loader.read_text("absent.ext").await.unwrap_err();
    assert!(error.to_string().contains("absent.ext"));
    Ok(())
}
