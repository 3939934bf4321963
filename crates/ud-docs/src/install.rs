//! Install snippets for every package manager.
//!
//! Component pages show a tabbed snippet with one command per package
//! manager. Two kinds of command exist:
//!
//! | Request | npm | pnpm | yarn | bun |
//! |---------|-----|------|------|-----|
//! | add component | `npx <cli>@latest add` | `pnpm dlx <cli>@latest add` | `yarn dlx <cli>@latest add` | `bunx --bun <cli>@latest add` |
//! | dependency | `npm install` | `pnpm add` | `yarn add` | `bun add` |
//! | dev dependency | `npm install --save-dev` | `pnpm add -D` | `yarn add -D` | `bun add -D` |

use std::fmt;

use ud_core::{InstallConfig, PackageManager};

use crate::error::InstallError;

/// What to install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallRequest {
    /// Copy registry components into the project with the registry CLI.
    Add {
        /// npm package of the registry CLI.
        cli_package: String,
        /// Component names.
        components: Vec<String>,
    },
    /// Install npm packages.
    Dependencies {
        /// Package specs, e.g. `react` or `@scope/pkg@^2`.
        packages: Vec<String>,
        /// Whether to install as development dependencies.
        dev: bool,
    },
}

impl InstallRequest {
    /// Creates a request to add registry components.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::Empty`] if no components are given, or
    /// [`InstallError::InvalidComponent`] for the first name that is not
    /// lowercase ASCII letters, digits and `-`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ud_core::{InstallConfig, PackageManager};
    /// use ud_docs::InstallRequest;
    ///
    /// let request = InstallRequest::add(&InstallConfig::default(), ["button", "date-picker"])?;
    /// assert_eq!(
    ///     request.command(PackageManager::Pnpm).to_string(),
    ///     "pnpm dlx uikit-cli@latest add button date-picker",
    /// );
    /// # Ok::<(), ud_docs::InstallError>(())
    /// ```
    pub fn add<I, S>(config: &InstallConfig, components: I) -> Result<Self, InstallError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let components = collect_checked(
            components,
            is_component_name,
            InstallError::InvalidComponent,
        )?;
        Ok(Self::Add {
            cli_package: config.cli_package.clone(),
            components,
        })
    }

    /// Creates a request to install npm packages.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::Empty`] if no packages are given, or
    /// [`InstallError::InvalidPackage`] for an empty spec or one containing
    /// whitespace.
    pub fn dependencies<I, S>(packages: I, dev: bool) -> Result<Self, InstallError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let packages = collect_checked(packages, is_package_spec, InstallError::InvalidPackage)?;
        Ok(Self::Dependencies { packages, dev })
    }

    /// Renders the command for one package manager.
    #[must_use]
    pub fn command(&self, manager: PackageManager) -> InstallCommand {
        let (program, mut args): (&'static str, Vec<String>) = match self {
            Self::Add { cli_package, .. } => {
                let cli = format!("{cli_package}@latest");
                match manager {
                    PackageManager::Npm => ("npx", vec![cli]),
                    PackageManager::Pnpm => ("pnpm", vec!["dlx".to_owned(), cli]),
                    PackageManager::Yarn => ("yarn", vec!["dlx".to_owned(), cli]),
                    PackageManager::Bun => ("bunx", vec!["--bun".to_owned(), cli]),
                }
            }
            Self::Dependencies { dev, .. } => {
                let (verb, dev_flag) = match manager {
                    PackageManager::Npm => ("install", "--save-dev"),
                    PackageManager::Pnpm | PackageManager::Yarn | PackageManager::Bun => {
                        ("add", "-D")
                    }
                };
                let mut args = vec![verb.to_owned()];
                if *dev {
                    args.push(dev_flag.to_owned());
                }
                (manager.name(), args)
            }
        };

        match self {
            Self::Add { components, .. } => {
                args.push("add".to_owned());
                args.extend(components.iter().cloned());
            }
            Self::Dependencies { packages, .. } => args.extend(packages.iter().cloned()),
        }

        InstallCommand {
            manager,
            program,
            args,
        }
    }

    /// Renders the command for every package manager, in tab order.
    #[must_use]
    pub fn all_managers(&self) -> Vec<InstallCommand> {
        PackageManager::ALL
            .into_iter()
            .map(|manager| self.command(manager))
            .collect()
    }
}

/// A rendered shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallCommand {
    /// Package manager the command is for.
    pub manager: PackageManager,
    /// Executable to run.
    pub program: &'static str,
    /// Arguments, in order.
    pub args: Vec<String>,
}

impl fmt::Display for InstallCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

fn collect_checked<I, S>(
    items: I,
    is_valid: fn(&str) -> bool,
    invalid: fn(String) -> InstallError,
) -> Result<Vec<String>, InstallError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let items = items
        .into_iter()
        .map(Into::into)
        .map(|item| if is_valid(&item) { Ok(item) } else { Err(invalid(item)) })
        .collect::<Result<Vec<_>, _>>()?;
    if items.is_empty() {
        return Err(InstallError::Empty);
    }
    Ok(items)
}

fn is_component_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

fn is_package_spec(spec: &str) -> bool {
    !spec.is_empty() && !spec.chars().any(char::is_whitespace)
}
