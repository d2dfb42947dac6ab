//! Directory sizes rebuilt from a recorded terminal session of `cd` and `ls` commands.

use std::collections::BTreeMap;

use id_arena::{Arena, Id};
use tracing::{debug, info, trace, warn};

use crate::config::DiskConfig;
use crate::error::{Error, Result};

pub type DirId = Id<Directory>;

#[derive(Debug)]
pub struct Directory {
    name: String,
    parent: Option<DirId>,
    entries: BTreeMap<String, Entry>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Entry {
    File { size: u64 },
    Dir(DirId),
}

impl Directory {
    fn new(name: &str, parent: Option<DirId>) -> Directory {
        Directory {
            name: name.to_owned(),
            parent,
            entries: BTreeMap::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<DirId> {
        self.parent
    }

    pub fn entries(&self) -> &BTreeMap<String, Entry> {
        &self.entries
    }
}

// Commands borrow their names from the input buffer.

#[derive(Debug, Eq, PartialEq)]
pub enum Listing<'p> {
    File { size: u64, name: &'p str },
    Dir { name: &'p str },
}

#[derive(Debug, Eq, PartialEq)]
pub enum Target<'p> {
    Root,
    Parent,
    Child(&'p str),
}

#[derive(Debug, Eq, PartialEq)]
pub enum Command<'p> {
    Cd(Target<'p>),
    Ls(Vec<Listing<'p>>),
}

#[derive(Debug)]
pub struct FileSystem {
    dirs: Arena<Directory>,
    root: DirId,
}

impl Default for FileSystem {
    fn default() -> FileSystem {
        let mut dirs = Arena::new();
        let root = dirs.alloc(Directory::new("/", None));
        FileSystem { dirs, root }
    }
}

impl FileSystem {
    /// Rebuilds the tree seen by a session. The session starts in the root directory.
    ///
    /// A directory can only be entered after an `ls` of its parent listed it.
    pub fn replay<'p, I>(commands: I) -> Result<FileSystem>
    where
        I: IntoIterator<Item = Command<'p>>,
    {
        let mut fs = FileSystem::default();
        let mut cwd = fs.root;

        for command in commands {
            match command {
                Command::Cd(Target::Root) => cwd = fs.root,
                Command::Cd(Target::Parent) => {
                    cwd = fs.dirs[cwd].parent.ok_or(Error::NoParentDirectory)?;
                }
                Command::Cd(Target::Child(name)) => cwd = fs.child(cwd, name)?,
                Command::Ls(listing) => fs.record(cwd, listing),
            }
            trace!(cwd = %fs.path(cwd), "replayed command");
        }

        debug!(directories = fs.dirs.len(), "rebuilt file system");
        Ok(fs)
    }

    pub fn root(&self) -> DirId {
        self.root
    }

    pub fn directory(&self, id: DirId) -> &Directory {
        &self.dirs[id]
    }

    /// Absolute path of a directory, `/` separated.
    pub fn path(&self, mut id: DirId) -> String {
        let mut names = vec![];
        while let Some(parent) = self.dirs[id].parent {
            names.push(self.dirs[id].name.as_str());
            id = parent;
        }
        names.reverse();
        format!("/{}", names.join("/"))
    }

    fn child(&self, dir: DirId, name: &str) -> Result<DirId> {
        match self.dirs[dir].entries.get(name) {
            Some(Entry::Dir(id)) => Ok(*id),
            Some(Entry::File { .. }) => Err(Error::NotADirectory(self.child_path(dir, name))),
            None => Err(Error::UnknownDirectory(self.child_path(dir, name))),
        }
    }

    fn child_path(&self, dir: DirId, name: &str) -> String {
        match self.path(dir).as_str() {
            "/" => format!("/{}", name),
            parent => format!("{}/{}", parent, name),
        }
    }

    // Listing a directory twice keeps what was found below it the first time.
    fn record(&mut self, dir: DirId, listing: Vec<Listing>) {
        for entry in listing {
            match entry {
                Listing::File { size, name } => {
                    self.dirs[dir]
                        .entries
                        .insert(name.to_owned(), Entry::File { size });
                }
                Listing::Dir { name } => {
                    if let Some(Entry::Dir(_)) = self.dirs[dir].entries.get(name) {
                        continue;
                    }
                    let id = self.dirs.alloc(Directory::new(name, Some(dir)));
                    self.dirs[dir].entries.insert(name.to_owned(), Entry::Dir(id));
                }
            }
        }
    }

    // Post-order walk: `f` sees every directory below and including `dir` with its total size.
    fn visit_sizes(&self, dir: DirId, f: &mut dyn FnMut(DirId, u64)) -> u64 {
        let size: u64 = self.dirs[dir]
            .entries
            .values()
            .map(|entry| match *entry {
                Entry::File { size } => size,
                Entry::Dir(child) => self.visit_sizes(child, f),
            })
            .sum();
        f(dir, size);
        size
    }

    /// Total size of all files below `dir`.
    pub fn total_size(&self, dir: DirId) -> u64 {
        self.visit_sizes(dir, &mut |_, _| ())
    }

    /// Sum of the sizes of the directories below the root that are no larger than `limit`.
    pub fn sum_of_small_dirs(&self, limit: u64) -> u64 {
        let root = self.root;
        let mut total = 0;
        self.visit_sizes(root, &mut |dir, size| {
            if dir != root && size <= limit {
                total += size;
            }
        });
        info!(limit, total, "summed small directories");
        total
    }

    /// Size of the smallest directory whose removal leaves `required_space` free.
    pub fn smallest_dir_to_free(&self, config: &DiskConfig) -> u64 {
        let mut sizes = vec![];
        let used = self.visit_sizes(self.root, &mut |_, size| sizes.push(size));
        let needed = config.space_to_free(used);

        let smallest = sizes.into_iter().filter(|&size| size >= needed).min();
        let size = smallest.unwrap_or_else(|| {
            warn!(used, needed, "removing every file does not free enough space");
            used
        });
        info!(used, needed, size, "found directory to delete");
        size
    }
}

pub mod parser {
    use super::*;

    use crate::parser::base10_numeric;

    use nom::branch::alt;
    use nom::bytes::complete::tag;
    use nom::character::complete::{line_ending, not_line_ending, space1};
    use nom::combinator::eof;
    use nom::multi::{many0, many1, separated_list1};
    use nom::sequence::{preceded, separated_pair, terminated, tuple};
    use nom::{IResult, Parser};

    fn name(input: &str) -> IResult<&str, &str> {
        not_line_ending.map(str::trim_end).parse(input)
    }

    fn prompt<'a, P, O>(command: P) -> impl Parser<&'a str, O, nom::error::Error<&'a str>>
    where
        P: Parser<&'a str, O, nom::error::Error<&'a str>>,
    {
        preceded(tuple((tag("$"), space1)), command)
    }

    fn listing(input: &str) -> IResult<&str, Listing> {
        alt((
            preceded(tuple((tag("dir"), space1)), name).map(|name| Listing::Dir { name }),
            separated_pair(base10_numeric, space1, name)
                .map(|(size, name)| Listing::File { size, name }),
        ))
        .parse(input)
    }

    fn ls(input: &str) -> IResult<&str, Command> {
        preceded(prompt(tag("ls")), many0(preceded(line_ending, listing)))
            .map(Command::Ls)
            .parse(input)
    }

    fn cd(input: &str) -> IResult<&str, Command> {
        preceded(prompt(tag("cd")), preceded(space1, name))
            .map(|target| {
                Command::Cd(match target {
                    "/" => Target::Root,
                    ".." => Target::Parent,
                    child => Target::Child(child),
                })
            })
            .parse(input)
    }

    pub fn parse_session(input: &str) -> IResult<&str, Vec<Command>> {
        terminated(
            separated_list1(many1(line_ending), alt((cd, ls))),
            tuple((many0(line_ending), eof)),
        )
        .parse(input)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_session() {
            let (tail, parsed) = parse_session(
                "$ cd /\n\
                 $ ls\n\
                 dir a\n\
                 1234 b.txt\n\
                 $ cd a\n\
                 $ ls\n\
                 4321 c\n\
                 $ cd ..\n",
            )
            .unwrap();

            assert_eq!("", tail);
            assert_eq!(
                vec![
                    Command::Cd(Target::Root),
                    Command::Ls(vec![
                        Listing::Dir { name: "a" },
                        Listing::File {
                            name: "b.txt",
                            size: 1234
                        }
                    ]),
                    Command::Cd(Target::Child("a")),
                    Command::Ls(vec![Listing::File {
                        name: "c",
                        size: 4321
                    }]),
                    Command::Cd(Target::Parent),
                ],
                parsed
            );
        }

        #[test]
        fn test_empty_listing() {
            let (_, parsed) = parse_session("$ ls\n$ cd x").unwrap();
            assert_eq!(
                parsed,
                vec![Command::Ls(vec![]), Command::Cd(Target::Child("x"))]
            );
        }

        #[test]
        fn test_rejects_unknown_command() {
            assert!(parse_session("$ cd /\n$ rm -rf a\n").is_err());
        }
    }
}
