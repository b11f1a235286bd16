use anyhow::Result;
use git2::{Repository, Signature};
use rebase_todo::cli::apply::ApplyCommand;
use rebase_todo::cli::message_editor::MessageEditorCommand;
use rebase_todo::cli::show::ShowCommand;
use rebase_todo::data::{EditPlan, Operation, RewordedMessageStore, TodoView};
use rebase_todo::git::{RebaseOutcome, RebaseRunner};
use rebase_todo::rebase::{format_script, parse_script, to_entries, to_model, Action};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test setup that creates a temporary git repository with test commits
struct TestRepo {
    _temp_dir: TempDir,
    repo_path: PathBuf,
    repo: Repository,
    commits: Vec<git2::Oid>,
}

impl TestRepo {
    fn new() -> Result<Self> {
        // Create temporary directory
        let temp_dir = tempfile::tempdir()?;
        let repo_path = temp_dir.path().to_path_buf();

        // Initialize git repository
        let repo = Repository::init(&repo_path)?;

        // Configure git user for commits
        let mut config = repo.config()?;
        config.set_str("user.name", "Test User")?;
        config.set_str("user.email", "test@example.com")?;

        Ok(TestRepo {
            _temp_dir: temp_dir,
            repo_path,
            repo,
            commits: Vec::new(),
        })
    }

    fn add_commit(&mut self, message: &str, content: &str) -> Result<git2::Oid> {
        self.add_file_commit("test.txt", message, content)
    }

    fn add_file_commit(&mut self, file: &str, message: &str, content: &str) -> Result<git2::Oid> {
        // Write the file
        fs::write(self.repo_path.join(file), content)?;

        // Add file to index
        let mut index = self.repo.index()?;
        index.add_path(Path::new(file))?;
        index.write()?;

        // Create commit
        let signature = Signature::now("Test User", "test@example.com")?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let parent_commit = match self.commits.last() {
            Some(last_commit_id) => Some(self.repo.find_commit(*last_commit_id)?),
            None => None,
        };
        let parents: Vec<&git2::Commit> = parent_commit.iter().collect();

        let commit_id = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;

        self.commits.push(commit_id);
        Ok(commit_id)
    }
}

const TODO: &str = "\
pick 1111111 Add parser
drop 2222222 Experiment
pick 3333333 Add tests
pick 4444444 Fix parser typo
update-ref refs/heads/parser

# Rebase 0000000..4444444 onto 0000000 (4 commands)
";

#[test]
fn test_dropped_commits_move_to_end() -> Result<()> {
    let entries = parse_script("pick A First\ndrop B Second\npick C Third\n")?;
    let model = to_model(entries)?;

    let flattened: Vec<_> = to_entries(&model)
        .into_iter()
        .map(|entry| (entry.action, entry.commit_id))
        .collect();
    assert_eq!(
        flattened,
        [
            (Action::Pick, "A".to_string()),
            (Action::Pick, "C".to_string()),
            (Action::Drop, "B".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn test_apply_rewrites_todo_file() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let todo_path = temp_dir.path().join("git-rebase-todo");
    let plan_path = temp_dir.path().join("plan.yaml");
    let messages_path = temp_dir.path().join("messages.yaml");
    fs::write(&todo_path, TODO)?;

    // Rows after loading: parser, tests, typo, update-ref, experiment (dropped).
    let plan = EditPlan {
        operations: vec![
            Operation::Move { from: 2, to: 1 },
            Operation::Unite {
                indices: vec![0, 1],
            },
            Operation::Reword {
                index: 0,
                message: "Add parser\n\nIncludes the typo fix.".to_string(),
            },
        ],
    };
    plan.save_to_file(&plan_path)?;

    let apply = ApplyCommand {
        plan: plan_path,
        messages: Some(messages_path.clone()),
        todo_file: todo_path.clone(),
    };
    apply.execute()?;

    let rewritten = fs::read_to_string(&todo_path)?;
    insta::assert_snapshot!(rewritten, @r"
    reword 1111111 Add parser
    fixup 4444444 Fix parser typo
    pick 3333333 Add tests
    update-ref refs/heads/parser
    drop 2222222 Experiment
    ");

    let store = RewordedMessageStore::load_from_file(&messages_path)?;
    assert_eq!(
        store.get("Add parser").map(str::trim_end),
        Some("Add parser\n\nIncludes the typo fix.")
    );
    Ok(())
}

#[test]
fn test_apply_rejects_unsupported_instructions() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let todo_path = temp_dir.path().join("git-rebase-todo");
    let plan_path = temp_dir.path().join("plan.yaml");
    fs::write(&todo_path, "pick 1111111 Add parser\nexec cargo test\n")?;
    EditPlan::default().save_to_file(&plan_path)?;

    let apply = ApplyCommand {
        plan: plan_path,
        messages: Some(temp_dir.path().join("messages.yaml")),
        todo_file: todo_path.clone(),
    };
    let err = apply.execute().unwrap_err();
    assert!(format!("{err:#}").contains("Unsupported rebase action"));

    // The todo file is left as git wrote it.
    assert_eq!(
        fs::read_to_string(&todo_path)?,
        "pick 1111111 Add parser\nexec cargo test\n"
    );
    Ok(())
}

#[test]
fn test_message_editor_replaces_stored_message() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let messages_path = temp_dir.path().join("messages.yaml");
    let message_file = temp_dir.path().join("COMMIT_EDITMSG");

    let mut store = RewordedMessageStore::default();
    store.insert("Add parser", "Add todo script parser");
    store.save_to_file(&messages_path)?;

    fs::write(&message_file, "Add parser\n\n# Please enter the commit message\n")?;
    MessageEditorCommand {
        messages: Some(messages_path.clone()),
        file: message_file.clone(),
    }
    .execute()?;
    assert_eq!(fs::read_to_string(&message_file)?, "Add todo script parser\n");

    fs::write(&message_file, "Unrelated commit\n")?;
    MessageEditorCommand {
        messages: Some(messages_path),
        file: message_file.clone(),
    }
    .execute()?;
    assert_eq!(fs::read_to_string(&message_file)?, "Unrelated commit\n");
    Ok(())
}

#[test]
fn test_show_renders_groups() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let todo_path = temp_dir.path().join("git-rebase-todo");
    fs::write(
        &todo_path,
        "pick 1111111 Add parser\nsquash 4444444 Fix parser typo\ndrop 2222222 Experiment\n",
    )?;

    let yaml = ShowCommand {
        todo_file: todo_path,
    }
    .render()?;
    let view: TodoView = rebase_todo::data::from_yaml(&yaml)?;

    let rows: Vec<_> = view
        .rows
        .iter()
        .map(|row| (row.action, row.commit.as_str(), row.root))
        .collect();
    assert_eq!(
        rows,
        [
            (Action::Pick, "1111111", None),
            (Action::Squash, "4444444", Some(0)),
            (Action::Drop, "2222222", None),
        ]
    );
    Ok(())
}

#[test]
fn test_unchanged_todo_round_trips() -> Result<()> {
    let script = "pick 1111111 Add parser\nedit 3333333 Add tests\nupdate-ref refs/heads/parser\n";
    let model = to_model(parse_script(script)?)?;
    assert_eq!(format_script(&to_entries(&model)), script);
    Ok(())
}

#[test]
fn test_runner_preflight_checks() -> Result<()> {
    let mut test_repo = TestRepo::new()?;
    let first = test_repo.add_commit("Initial commit", "Hello, world!")?;
    test_repo.add_commit("Add feature", "Hello, world!\nNew feature added.")?;

    let runner = RebaseRunner::open(&test_repo.repo_path)?;
    runner.check_no_operation_in_progress()?;
    runner.check_working_directory_clean()?;
    assert_eq!(runner.resolve_base("HEAD~1")?, first.to_string());
    assert!(runner.resolve_base("no-such-branch").is_err());

    fs::write(test_repo.repo_path.join("untracked.txt"), "dirty")?;
    assert!(runner.check_working_directory_clean().is_err());
    Ok(())
}

#[test]
fn test_run_unites_and_rewords_commits() -> Result<()> {
    let mut test_repo = TestRepo::new()?;
    let base = test_repo.add_file_commit("README", "Initial commit", "readme\n")?;
    test_repo.add_file_commit("parser.txt", "Add parser", "fn prase() {}\n")?;
    test_repo.add_file_commit("tests.txt", "Add tests", "test parse\n")?;
    test_repo.add_file_commit("parser.txt", "Fix parser typo", "fn parse() {}\n")?;

    // Plan and message store live outside the work tree
    let scratch = tempfile::tempdir()?;
    let plan_path = scratch.path().join("plan.yaml");
    let messages_path = scratch.path().join("messages.yaml");
    EditPlan {
        operations: vec![
            Operation::Move { from: 2, to: 1 },
            Operation::Unite {
                indices: vec![0, 1],
            },
            Operation::Reword {
                index: 0,
                message: "Add parser\n\nIncludes the typo fix.".to_string(),
            },
        ],
    }
    .save_to_file(&plan_path)?;

    let runner = RebaseRunner::open(&test_repo.repo_path)?
        .with_editor(env!("CARGO_BIN_EXE_rebase-todo"))
        .with_messages(&messages_path);
    let outcome = runner.run_interactive(&base.to_string(), &plan_path)?;
    assert_eq!(outcome, RebaseOutcome::Completed);

    // History is now: base, united + reworded parser commit, tests
    let repo = Repository::open(&test_repo.repo_path)?;
    let head = repo.head()?.peel_to_commit()?;
    assert_eq!(head.summary(), Some("Add tests"));

    let united = head.parent(0)?;
    assert_eq!(
        united.message().map(str::trim_end),
        Some("Add parser\n\nIncludes the typo fix.")
    );
    assert_eq!(united.parent_id(0)?, base);

    let parser = united
        .tree()?
        .get_path(Path::new("parser.txt"))?
        .to_object(&repo)?
        .peel_to_blob()?;
    assert_eq!(parser.content(), b"fn parse() {}\n");
    assert!(united.tree()?.get_path(Path::new("tests.txt")).is_err());
    Ok(())
}

#[test]
fn test_runner_requires_repository() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    assert!(RebaseRunner::open(temp_dir.path()).is_err());
    Ok(())
}
