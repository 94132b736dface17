use anyhow::Result;
use std::path::{Path, PathBuf};
use xcommon::Scaler;

#[derive(Debug)]
pub enum Error {
    MissingDependency,
    MissingSourceFile(PathBuf),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::MissingDependency => write!(
                f,
                "png support required: enable the `png` feature of the `image` crate"
            ),
            Self::MissingSourceFile(path) => {
                write!(f, "Source icon not found: {}", path.display())
            }
        }
    }
}

impl std::error::Error for Error {}

/// Paths of a flutter project relative to its root.
#[derive(Clone, Debug)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn source(&self) -> PathBuf {
        self.root.join("assets").join("logo.png")
    }

    pub fn android_res(&self) -> PathBuf {
        self.root
            .join("android")
            .join("app")
            .join("src")
            .join("main")
            .join("res")
    }

    pub fn ios_appiconset(&self) -> PathBuf {
        self.root
            .join("ios")
            .join("Runner")
            .join("Assets.xcassets")
            .join("AppIcon.appiconset")
    }
}

/// Generates all android and ios icons of `project` from its logo.
pub fn generate(project: &Project) -> Result<()> {
    if !xcommon::png_supported() {
        return Err(Error::MissingDependency.into());
    }
    let source = project.source();
    if !source.exists() {
        return Err(Error::MissingSourceFile(source).into());
    }
    let scaler = Scaler::open(&source)?;

    mipmap::generate(&scaler, &project.android_res())?;
    println!("Android icons generated");

    appiconset::generate(&scaler, &project.ios_appiconset())?;
    println!("iOS icons generated");
    Ok(())
}
