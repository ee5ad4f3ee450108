use crate::{LockEntry, LockError, LockRecord, LockResource};
use libretto_package::Package;
use tracing::debug;

/// Resolves a (name, exact version) pair to a live package entity.
pub trait RepositoryManager: Send + Sync {
    fn find_package(&self, name: &str, version: &str) -> Option<Package>;
}

/// Reconciles the persisted lock record with a live package repository.
///
/// Three independent operations over one persisted resource; each either
/// completes fully or fails without observable partial state.
pub struct Locker {
    resource: Box<dyn LockResource>,
    repository: Box<dyn RepositoryManager>,
}

impl Locker {
    pub fn new(resource: Box<dyn LockResource>, repository: Box<dyn RepositoryManager>) -> Self {
        Self {
            resource,
            repository,
        }
    }

    /// Whether a lock record has been persisted. Pure existence check.
    pub fn is_locked(&self) -> bool {
        self.resource.exists()
    }

    /// Read the persisted record and resolve every entry against the
    /// repository, in persisted order. Fails if the record does not exist
    /// or any entry cannot be resolved; never returns a partial list.
    pub fn locked_packages(&self) -> Result<Vec<Package>, LockError> {
        if !self.resource.exists() {
            return Err(LockError::NotLocked(
                self.resource.path().display().to_string(),
            ));
        }

        let record = self.resource.read()?;
        let mut packages = Vec::with_capacity(record.len());
        for entry in &record {
            let package = self
                .repository
                .find_package(&entry.package, &entry.version)
                .ok_or_else(|| LockError::UnresolvedEntry {
                    package: entry.package.clone(),
                    version: entry.version.clone(),
                })?;
            packages.push(package);
        }
        debug!(count = packages.len(), "resolved locked packages");
        Ok(packages)
    }

    /// Persist the given packages as the new lock record, in input order,
    /// replacing any prior content in full. The whole batch is rejected
    /// before anything is written if any package lacks a usable name or
    /// version.
    pub fn lock_packages(&self, packages: &[Package]) -> Result<(), LockError> {
        let mut entries = Vec::with_capacity(packages.len());
        for package in packages {
            if package.name().is_empty() || package.version().is_empty() {
                return Err(LockError::UnlockablePackage(package.name().to_owned()));
            }
            entries.push(LockEntry {
                package: package.name().to_owned(),
                version: package.version().to_owned(),
            });
        }

        let record = LockRecord::new(entries);
        debug!(entries = record.len(), "writing lock record");
        self.resource.write(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    /// In-memory `LockResource` recording every write.
    struct MemoryLock {
        path: PathBuf,
        content: Mutex<Option<LockRecord>>,
    }

    impl MemoryLock {
        fn empty() -> Self {
            Self {
                path: PathBuf::from("<memory>"),
                content: Mutex::new(None),
            }
        }

        fn with(record: LockRecord) -> Self {
            Self {
                path: PathBuf::from("<memory>"),
                content: Mutex::new(Some(record)),
            }
        }
    }

    impl LockResource for MemoryLock {
        fn exists(&self) -> bool {
            self.content.lock().unwrap().is_some()
        }

        fn read(&self) -> Result<LockRecord, LockError> {
            self.content
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| LockError::NotLocked(self.path.display().to_string()))
        }

        fn write(&self, record: &LockRecord) -> Result<(), LockError> {
            *self.content.lock().unwrap() = Some(record.clone());
            Ok(())
        }

        fn path(&self) -> &Path {
            &self.path
        }
    }

    /// Repository backed by a fixed (name, version) table.
    #[derive(Default)]
    struct TableRepository {
        packages: HashMap<(String, String), Package>,
    }

    impl TableRepository {
        fn with(pairs: &[(&str, &str)]) -> Self {
            let mut packages = HashMap::new();
            for (name, version) in pairs {
                packages.insert(
                    ((*name).to_owned(), (*version).to_owned()),
                    Package::new(*name, *version),
                );
            }
            Self { packages }
        }
    }

    impl RepositoryManager for TableRepository {
        fn find_package(&self, name: &str, version: &str) -> Option<Package> {
            self.packages
                .get(&(name.to_owned(), version.to_owned()))
                .cloned()
        }
    }

    fn record(pairs: &[(&str, &str)]) -> LockRecord {
        pairs
            .iter()
            .map(|(p, v)| LockEntry {
                package: (*p).to_owned(),
                version: (*v).to_owned(),
            })
            .collect()
    }

    #[test]
    fn is_locked_checks_existence() {
        let locker = Locker::new(
            Box::new(MemoryLock::empty()),
            Box::new(TableRepository::default()),
        );
        assert!(!locker.is_locked());

        let locker = Locker::new(
            Box::new(MemoryLock::with(LockRecord::default())),
            Box::new(TableRepository::default()),
        );
        assert!(locker.is_locked());
    }

    #[test]
    fn locked_packages_fails_when_not_locked() {
        let locker = Locker::new(
            Box::new(MemoryLock::empty()),
            Box::new(TableRepository::with(&[("pkg1", "1.0.0")])),
        );
        assert!(matches!(
            locker.locked_packages(),
            Err(LockError::NotLocked(_))
        ));
    }

    #[test]
    fn locked_packages_resolves_in_persisted_order() {
        let locker = Locker::new(
            Box::new(MemoryLock::with(record(&[
                ("pkg1", "1.0.0-beta"),
                ("pkg2", "0.1.10"),
            ]))),
            Box::new(TableRepository::with(&[
                ("pkg2", "0.1.10"),
                ("pkg1", "1.0.0-beta"),
            ])),
        );
        let packages = locker.locked_packages().unwrap();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].name(), "pkg1");
        assert_eq!(packages[0].version(), "1.0.0-beta");
        assert_eq!(packages[1].name(), "pkg2");
    }

    #[test]
    fn unresolved_entry_fails_the_whole_read() {
        let locker = Locker::new(
            Box::new(MemoryLock::with(record(&[
                ("pkg1", "1.0.0-beta"),
                ("pkg2", "0.1.10"),
            ]))),
            Box::new(TableRepository::with(&[("pkg1", "1.0.0-beta")])),
        );
        match locker.locked_packages() {
            Err(LockError::UnresolvedEntry { package, version }) => {
                assert_eq!(package, "pkg2");
                assert_eq!(version, "0.1.10");
            }
            other => panic!("expected UnresolvedEntry, got {other:?}"),
        }
    }

    #[test]
    fn lock_packages_writes_pairs_in_input_order() {
        let resource = Box::new(MemoryLock::empty());
        let locker = Locker::new(resource, Box::new(TableRepository::default()));
        locker
            .lock_packages(&[
                Package::new("pkg1", "1.0.0-beta"),
                Package::new("pkg2", "0.1.10"),
            ])
            .unwrap();

        let written = locker.resource.read().unwrap();
        assert_eq!(
            written,
            record(&[("pkg1", "1.0.0-beta"), ("pkg2", "0.1.10")])
        );
    }

    #[test]
    fn lock_packages_rejects_the_batch_before_writing() {
        let prior = record(&[("kept", "1.0.0")]);
        let locker = Locker::new(
            Box::new(MemoryLock::with(prior.clone())),
            Box::new(TableRepository::default()),
        );
        let err = locker
            .lock_packages(&[Package::new("pkg1", "1.0.0"), Package::new("pkg2", "")])
            .unwrap_err();
        assert!(matches!(err, LockError::UnlockablePackage(name) if name == "pkg2"));
        assert_eq!(
            locker.resource.read().unwrap(),
            prior,
            "prior content must be untouched"
        );
    }

    #[test]
    fn lock_packages_rejects_empty_names_too() {
        let locker = Locker::new(
            Box::new(MemoryLock::empty()),
            Box::new(TableRepository::default()),
        );
        assert!(matches!(
            locker.lock_packages(&[Package::new("", "1.0.0")]),
            Err(LockError::UnlockablePackage(_))
        ));
        assert!(!locker.is_locked(), "nothing may be written");
    }

    #[test]
    fn lock_then_read_round_trips() {
        let locker = Locker::new(
            Box::new(MemoryLock::empty()),
            Box::new(TableRepository::with(&[
                ("pkg1", "1.0.0-beta"),
                ("pkg2", "0.1.10"),
            ])),
        );
        let input = [
            Package::new("pkg1", "1.0.0-beta"),
            Package::new("pkg2", "0.1.10"),
        ];
        locker.lock_packages(&input).unwrap();
        let output = locker.locked_packages().unwrap();
        let pairs: Vec<(&str, &str)> = output.iter().map(|p| (p.name(), p.version())).collect();
        assert_eq!(pairs, [("pkg1", "1.0.0-beta"), ("pkg2", "0.1.10")]);
    }
}
