use git2::{Oid, Repository as Git2Repo, Sort};
use std::path::Path;
use tracing::debug;

use crate::domain::{RevisionRef, TagInfo};
use crate::error::{FixVersionError, Result};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn commit_oid(&self, revision: &RevisionRef) -> Result<Oid> {
        match revision {
            RevisionRef::Head => Ok(self.repo.head()?.peel_to_commit()?.id()),
            RevisionRef::Tag { oid, .. } => Ok(*oid),
        }
    }
}

impl super::Repository for Git2Repository {
    fn tags_by_commit_time(&self) -> Result<Vec<TagInfo>> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::new();

        for name in names.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;
            // Tags on trees or blobs have no commit time to order by
            match reference.peel_to_commit() {
                Ok(commit) => tags.push(TagInfo::new(name, commit.id(), commit.time().seconds())),
                Err(e) => debug!(tag = name, error = %e, "skipping tag that does not point at a commit"),
            }
        }

        super::sort_by_commit_time(&mut tags);
        Ok(tags)
    }

    fn commits_between(&self, first: &RevisionRef, second: &RevisionRef) -> Result<Vec<String>> {
        let first_oid = self.commit_oid(first)?;
        let second_oid = self.commit_oid(second)?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push(first_oid)?;
        revwalk.push(second_oid)?;

        // Unrelated histories have no merge base; then both sides are listed in full
        match self.repo.merge_bases(first_oid, second_oid) {
            Ok(bases) => {
                for base in bases.iter() {
                    revwalk.hide(*base)?;
                }
            }
            Err(e) if e.code() == git2::ErrorCode::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let mut subjects = Vec::new();
        for oid_result in revwalk {
            let commit = self.repo.find_commit(oid_result?)?;
            subjects.push(commit.summary().unwrap_or("").to_string());
        }

        debug!(
            first = %first,
            second = %second,
            count = subjects.len(),
            "collected commit subjects"
        );
        Ok(subjects)
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        let signature = self.repo.signature()?;

        self.repo
            .tag(name, head.as_object(), &signature, message, false)
            .map_err(|e| FixVersionError::remote(format!("Cannot create tag '{}': {}", name, e)))?;

        Ok(())
    }

    fn push_tag(&self, remote: &str, name: &str) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| FixVersionError::remote(format!("Cannot find remote: {}", e)))?;

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            let username = username_from_url.unwrap_or("git");
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }

                if let Some(home) = dirs::home_dir() {
                    for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                        let path = home.join(".ssh").join(key);
                        if path.exists() {
                            if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                                return Ok(cred);
                            }
                        }
                    }
                }
            }

            git2::Cred::default()
        });

        // The server can reject a single ref while the push itself succeeds
        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "Push rejected for {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let refspec = format!("refs/tags/{}:refs/tags/{}", name, name);
        remote
            .push(&[refspec.as_str()], Some(&mut push_options))
            .map_err(|e| match e.class() {
                git2::ErrorClass::Net => {
                    FixVersionError::remote(format!("Network error during push: {}", e))
                }
                _ => FixVersionError::remote(format!("Failed to push tag '{}': {}", name, e)),
            })?;

        Ok(())
    }
}
