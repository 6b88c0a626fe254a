//! Artifact repositories.
//!
//! Repositories are an independent model element. They do not take part in
//! variant generation and are only consulted by dependency resolution, which
//! lives outside this crate. The only repository kind is a set of prebuilt
//! libraries whose paths are resolved through a [`FileResolver`].

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Result};
use serde::Serialize;

use crate::core::axis::{Named, NamedContainer};
use crate::core::errors::ModelError;
use crate::util::fs::normalize_lexical;

/// Turns user-supplied paths into absolute paths.
pub trait FileResolver: fmt::Debug {
    fn resolve(&self, path: &Path) -> Result<PathBuf>;
}

/// Resolves relative paths against a base directory.
#[derive(Debug, Clone)]
pub struct BaseDirResolver {
    base: PathBuf,
}

impl BaseDirResolver {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        BaseDirResolver { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }
}

impl FileResolver for BaseDirResolver {
    fn resolve(&self, path: &Path) -> Result<PathBuf> {
        if path.as_os_str().is_empty() {
            bail!("cannot resolve an empty path");
        }
        if path.is_absolute() {
            Ok(normalize_lexical(path))
        } else {
            Ok(normalize_lexical(&self.base.join(path)))
        }
    }
}

/// A library shipped as prebuilt headers and binaries.
#[derive(Debug, Clone, Serialize)]
pub struct PrebuiltLibrary {
    name: String,
    headers: Vec<PathBuf>,
    binaries: Vec<PathBuf>,
    #[serde(skip)]
    resolver: Arc<dyn FileResolver>,
}

impl PrebuiltLibrary {
    fn new(name: impl Into<String>, resolver: Arc<dyn FileResolver>) -> Self {
        PrebuiltLibrary {
            name: name.into(),
            headers: Vec::new(),
            binaries: Vec::new(),
            resolver,
        }
    }

    /// Add a header directory, resolved immediately.
    pub fn header_dir(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, ModelError> {
        let resolved = self.resolve(path.as_ref())?;
        self.headers.push(resolved);
        Ok(self)
    }

    /// Add a library file, resolved immediately.
    pub fn binary_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, ModelError> {
        let resolved = self.resolve(path.as_ref())?;
        self.binaries.push(resolved);
        Ok(self)
    }

    pub fn headers(&self) -> &[PathBuf] {
        &self.headers
    }

    pub fn binaries(&self) -> &[PathBuf] {
        &self.binaries
    }

    fn resolve(&self, path: &Path) -> Result<PathBuf, ModelError> {
        self.resolver.resolve(path).map_err(|e| {
            ModelError::configuration(format!("prebuilt library `{}`", self.name), format!("{:#}", e))
        })
    }
}

impl Named for PrebuiltLibrary {
    const KIND: &'static str = "prebuilt library";

    fn name(&self) -> &str {
        &self.name
    }
}

/// A repository of prebuilt libraries.
#[derive(Debug, Clone)]
pub struct PrebuiltLibraries {
    name: String,
    libraries: NamedContainer<PrebuiltLibrary>,
    resolver: Arc<dyn FileResolver>,
}

impl PrebuiltLibraries {
    pub fn new(name: impl Into<String>, resolver: Arc<dyn FileResolver>) -> Self {
        PrebuiltLibraries {
            name: name.into(),
            libraries: NamedContainer::new(),
            resolver,
        }
    }

    /// Declare a library. Fails if the name is taken.
    pub fn create(&mut self, name: impl Into<String>) -> Result<&mut PrebuiltLibrary, ModelError> {
        let library = PrebuiltLibrary::new(name, Arc::clone(&self.resolver));
        self.libraries.add(library)
    }

    pub fn resolve_library(&self, name: &str) -> Option<&PrebuiltLibrary> {
        self.libraries.get(name)
    }

    pub fn libraries(&self) -> impl Iterator<Item = &PrebuiltLibrary> {
        self.libraries.iter()
    }
}

/// Kinds of repositories that can be created by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryKind {
    Prebuilt,
}

impl RepositoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepositoryKind::Prebuilt => "prebuilt",
        }
    }
}

impl fmt::Display for RepositoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RepositoryKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prebuilt" | "prebuilt-libraries" => Ok(RepositoryKind::Prebuilt),
            _ => Err(ModelError::configuration(
                "repository kind",
                format!("invalid kind '{}', valid values: prebuilt", s),
            )),
        }
    }
}

/// An artifact repository definition.
#[derive(Debug, Clone)]
pub enum ArtifactRepository {
    Prebuilt(PrebuiltLibraries),
}

impl ArtifactRepository {
    pub fn kind(&self) -> RepositoryKind {
        match self {
            ArtifactRepository::Prebuilt(_) => RepositoryKind::Prebuilt,
        }
    }
}

impl Named for ArtifactRepository {
    const KIND: &'static str = "repository";

    fn name(&self) -> &str {
        match self {
            ArtifactRepository::Prebuilt(libs) => &libs.name,
        }
    }
}

type RepositoryFactory = Box<dyn Fn(&str, Arc<dyn FileResolver>) -> ArtifactRepository>;

/// The repositories model element.
///
/// Repositories are created through a factory registered per kind.
pub struct Repositories {
    resolver: Arc<dyn FileResolver>,
    factories: HashMap<RepositoryKind, RepositoryFactory>,
    repositories: NamedContainer<ArtifactRepository>,
}

impl Repositories {
    /// Create the container with the built-in prebuilt-libraries factory.
    pub fn new(resolver: Arc<dyn FileResolver>) -> Self {
        let mut repositories = Repositories {
            resolver,
            factories: HashMap::new(),
            repositories: NamedContainer::new(),
        };
        repositories.register_factory(
            RepositoryKind::Prebuilt,
            Box::new(|name, resolver| {
                ArtifactRepository::Prebuilt(PrebuiltLibraries::new(name, resolver))
            }),
        );
        repositories
    }

    /// Register the factory used for `kind`, replacing any previous one.
    pub fn register_factory(&mut self, kind: RepositoryKind, factory: RepositoryFactory) {
        self.factories.insert(kind, factory);
    }

    /// Create a repository of `kind` called `name`.
    pub fn create(
        &mut self,
        kind: RepositoryKind,
        name: &str,
    ) -> Result<&mut ArtifactRepository, ModelError> {
        let factory = self.factories.get(&kind).ok_or_else(|| {
            ModelError::configuration(
                format!("repository `{}`", name),
                format!("no factory registered for {} repositories", kind),
            )
        })?;
        let repository = factory(name, Arc::clone(&self.resolver));
        self.repositories.add(repository)
    }

    /// Create a prebuilt-libraries repository called `name`.
    pub fn prebuilt(&mut self, name: &str) -> Result<&mut PrebuiltLibraries, ModelError> {
        match self.create(RepositoryKind::Prebuilt, name)? {
            ArtifactRepository::Prebuilt(libs) => Ok(libs),
        }
    }

    /// Find a prebuilt library by name, searching repositories in order.
    pub fn resolve_library(&self, name: &str) -> Option<&PrebuiltLibrary> {
        self.repositories.iter().find_map(|repo| match repo {
            ArtifactRepository::Prebuilt(libs) => libs.resolve_library(name),
        })
    }

    pub fn get(&self, name: &str) -> Option<&ArtifactRepository> {
        self.repositories.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ArtifactRepository> {
        self.repositories.get_mut(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArtifactRepository> {
        self.repositories.iter()
    }

    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }
}

impl fmt::Debug for Repositories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repositories")
            .field("resolver", &self.resolver)
            .field("kinds", &self.factories.keys().collect::<Vec<_>>())
            .field("repositories", &self.repositories)
            .finish()
    }
}
