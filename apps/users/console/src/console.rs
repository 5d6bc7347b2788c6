//! Menu-driven dialogue over [`UserService`].
//!
//! Questions go through a [`Prompter`]; results are written to a generic
//! sink so the whole dialogue can be scripted in tests. Closing the input
//! behaves like choosing Exit.

use crate::prompt::Prompter;
use domain_users::{CreateUser, UpdateUser, User, UserRepository, UserService};
use std::fmt::Display;
use std::io::{self, ErrorKind, Write};

const MAIN_MENU: [&str; 8] = [
    "Create User",
    "Get User by ID",
    "Get User by Email",
    "Get All Users",
    "Update User",
    "Delete User",
    "Search Users",
    "Exit",
];

const SEARCH_MENU: [&str; 2] = ["Search by name", "Search by age range"];

pub struct Console<R: UserRepository, P, O> {
    service: UserService<R>,
    prompter: P,
    output: O,
}

impl<R, P, O> Console<R, P, O>
where
    R: UserRepository,
    P: Prompter,
    O: Write,
{
    pub fn new(service: UserService<R>, prompter: P, output: O) -> Self {
        Self {
            service,
            prompter,
            output,
        }
    }

    /// Show the menu until the user exits or input ends
    pub async fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "=== User Service Console ===")?;

        loop {
            match self.step().await {
                Ok(true) => continue,
                Ok(false) => break,
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e),
            }
        }

        writeln!(self.output, "Goodbye!")?;
        self.output.flush()
    }

    /// One menu round; `false` once the user chose to exit
    async fn step(&mut self) -> io::Result<bool> {
        self.output.flush()?;
        let choice = self.prompter.select("Main Menu", &MAIN_MENU)?;

        match choice {
            0 => self.create_user().await?,
            1 => self.get_user_by_id().await?,
            2 => self.get_user_by_email().await?,
            3 => self.list_users().await?,
            4 => self.update_user().await?,
            5 => self.delete_user().await?,
            6 => self.search_users().await?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    async fn create_user(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== Create User ===")?;
        let name = self.prompter.text("Enter name", "Name cannot be empty")?;
        let email = self.prompter.text("Enter email", "Email cannot be empty")?;
        let age = self
            .prompter
            .optional::<i32>("Enter age (optional, press Enter to skip)")?;

        match self.service.create(CreateUser::new(name, email, age)).await {
            Ok(user) => writeln!(self.output, "User created successfully: {}", describe(&user)),
            Err(e) => self.print_error(e),
        }
    }

    async fn get_user_by_id(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== Get User by ID ===")?;
        let id = self.prompter.number::<i64>("Enter user ID")?;

        match self.service.get_by_id(id).await {
            Ok(Some(user)) => writeln!(self.output, "User found: {}", describe(&user)),
            Ok(None) => writeln!(self.output, "User not found with ID: {id}"),
            Err(e) => self.print_error(e),
        }
    }

    async fn get_user_by_email(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== Get User by Email ===")?;
        let email = self.prompter.text("Enter email", "Email cannot be empty")?;

        match self.service.get_by_email(&email).await {
            Ok(Some(user)) => writeln!(self.output, "User found: {}", describe(&user)),
            Ok(None) => writeln!(self.output, "User not found with email: {email}"),
            Err(e) => self.print_error(e),
        }
    }

    async fn list_users(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== All Users ===")?;

        match self.service.list_all().await {
            Ok(users) => self.print_users(&users),
            Err(e) => self.print_error(e),
        }
    }

    async fn update_user(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== Update User ===")?;
        let id = self.prompter.number::<i64>("Enter user ID to update")?;

        let current = match self.service.get_by_id(id).await {
            Ok(Some(user)) => user,
            Ok(None) => return writeln!(self.output, "User not found with ID: {id}"),
            Err(e) => return self.print_error(e),
        };

        writeln!(self.output, "Current user: {}", describe(&current))?;
        writeln!(self.output, "Enter new values (press Enter to keep current value):")?;
        self.output.flush()?;

        let patch = UpdateUser {
            name: self.prompter.optional(&format!("Name [{}]", current.name))?,
            email: self.prompter.optional(&format!("Email [{}]", current.email))?,
            age: self.prompter.optional(&format!("Age [{}]", age_label(&current)))?,
        };

        match self.service.update(id, patch).await {
            Ok(user) => writeln!(self.output, "User updated successfully: {}", describe(&user)),
            Err(e) => self.print_error(e),
        }
    }

    async fn delete_user(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== Delete User ===")?;
        let id = self.prompter.number::<i64>("Enter user ID to delete")?;

        let user = match self.service.get_by_id(id).await {
            Ok(Some(user)) => user,
            Ok(None) => return writeln!(self.output, "User not found with ID: {id}"),
            Err(e) => return self.print_error(e),
        };

        writeln!(self.output, "User to delete: {}", describe(&user))?;
        self.output.flush()?;
        if !self
            .prompter
            .confirm("Are you sure you want to delete this user?")?
        {
            return writeln!(self.output, "Deletion cancelled.");
        }

        match self.service.delete(id).await {
            Ok(true) => writeln!(self.output, "User deleted successfully."),
            Ok(false) => writeln!(self.output, "User not found with ID: {id}"),
            Err(e) => self.print_error(e),
        }
    }

    async fn search_users(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== Search Users ===")?;
        self.output.flush()?;

        let result = match self.prompter.select("Search", &SEARCH_MENU)? {
            0 => {
                let fragment = self
                    .prompter
                    .text("Enter name fragment", "Name cannot be empty")?;
                self.service.search_by_name(&fragment).await
            }
            _ => {
                let min = self.prompter.number::<i32>("Enter minimum age")?;
                let max = self.prompter.number::<i32>("Enter maximum age")?;
                self.service.search_by_age_range(min, max).await
            }
        };

        match result {
            Ok(users) => self.print_users(&users),
            Err(e) => self.print_error(e),
        }
    }

    fn print_users(&mut self, users: &[User]) -> io::Result<()> {
        if users.is_empty() {
            return writeln!(self.output, "No users found.");
        }

        writeln!(self.output, "Found {} user(s):", users.len())?;
        for (i, user) in users.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, describe(user))?;
        }
        Ok(())
    }

    fn print_error(&mut self, error: impl Display) -> io::Result<()> {
        writeln!(self.output, "Error: {error}")
    }
}

fn age_label(user: &User) -> String {
    user.age.map_or_else(|| "-".to_string(), |age| age.to_string())
}

fn describe(user: &User) -> String {
    format!(
        "#{} {} <{}>, age {}, created {}",
        user.id,
        user.name,
        user.email,
        age_label(user),
        user.created_at.format("%Y-%m-%d %H:%M:%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_users::InMemoryUserRepository;
    use std::collections::VecDeque;
    use std::fmt::Debug;
    use std::str::FromStr;

    /// Answers questions from a fixed list and records what was asked.
    struct Script {
        answers: VecDeque<String>,
        asked: Vec<String>,
    }

    impl Script {
        fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.to_string()).collect(),
                asked: Vec::new(),
            }
        }

        fn answer(&mut self, prompt: &str) -> io::Result<String> {
            self.asked.push(prompt.to_string());
            self.answers
                .pop_front()
                .map(|a| a.trim().to_string())
                .ok_or_else(|| io::Error::new(ErrorKind::UnexpectedEof, "no more answers"))
        }

        fn saw(&self, line: &str) -> bool {
            self.asked.iter().any(|asked| asked == line)
        }
    }

    impl Prompter for Script {
        fn select(&mut self, prompt: &str, items: &[&str]) -> io::Result<usize> {
            loop {
                let answer = self.answer(prompt)?;
                match items.iter().position(|item| *item == answer) {
                    Some(index) => return Ok(index),
                    None => self.asked.push(format!("no such item: {answer}")),
                }
            }
        }

        fn text(&mut self, prompt: &str, empty_message: &str) -> io::Result<String> {
            loop {
                let answer = self.answer(prompt)?;
                if !answer.is_empty() {
                    return Ok(answer);
                }
                self.asked.push(empty_message.to_string());
            }
        }

        fn number<T>(&mut self, prompt: &str) -> io::Result<T>
        where
            T: FromStr + Clone + ToString,
            T::Err: Debug + ToString,
        {
            loop {
                match self.answer(prompt)?.parse() {
                    Ok(value) => return Ok(value),
                    Err(e) => self.asked.push(format!("invalid number: {}", e.to_string())),
                }
            }
        }

        fn optional<T: FromStr>(&mut self, prompt: &str) -> io::Result<Option<T>> {
            loop {
                let answer = self.answer(prompt)?;
                if answer.is_empty() {
                    return Ok(None);
                }
                match answer.parse() {
                    Ok(value) => return Ok(Some(value)),
                    Err(_) => self.asked.push("Invalid value, please try again.".to_string()),
                }
            }
        }

        fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
            let answer = self.answer(prompt)?;
            Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
        }
    }

    async fn session(
        service: UserService<InMemoryUserRepository>,
        answers: &[&str],
    ) -> (String, Script) {
        let mut script = Script::new(answers);
        let mut output = Vec::new();
        Console::new(service, &mut script, &mut output)
            .run()
            .await
            .unwrap();
        (String::from_utf8(output).unwrap(), script)
    }

    fn service() -> UserService<InMemoryUserRepository> {
        UserService::new(InMemoryUserRepository::new())
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let answers = [
            "Create User", "Ann", "ann@x.com", "30",
            "Get All Users",
            "Exit",
        ];
        let (out, _) = session(service(), &answers).await;

        assert!(out.contains("User created successfully: #1 Ann <ann@x.com>, age 30"));
        assert!(out.contains("Found 1 user(s):\n1. #1 Ann <ann@x.com>"));
        assert!(out.ends_with("Goodbye!\n"));
    }

    #[tokio::test]
    async fn test_unknown_menu_entry_is_reasked() {
        let (out, script) = session(service(), &["Launch", "Get All Users", "Exit"]).await;

        assert!(script.saw("no such item: Launch"));
        assert!(out.contains("No users found."));
    }

    #[tokio::test]
    async fn test_create_reasks_blank_and_unparsable_fields() {
        let answers = ["Create User", "", "Ann", "ann@x.com", "old", "", "Exit"];
        let (out, script) = session(service(), &answers).await;

        assert!(script.saw("Name cannot be empty"));
        assert!(script.saw("Invalid value, please try again."));
        assert!(out.contains("User created successfully: #1 Ann <ann@x.com>, age -"));
    }

    #[tokio::test]
    async fn test_service_errors_are_printed_and_menu_continues() {
        let answers = [
            "Create User", "Ann", "ann@x.com", "",
            "Create User", "Bea", "ann@x.com", "",
            "Create User", "Cid", "broken", "200",
            "Get All Users",
            "Exit",
        ];
        let (out, _) = session(service(), &answers).await;

        assert!(out.contains("Error: Email already exists: ann@x.com"));
        assert!(out.contains("Error: Invalid input"));
        assert!(out.contains("Found 1 user(s):"));
    }

    #[tokio::test]
    async fn test_get_by_id_and_email() {
        let answers = [
            "Create User", "Ann", "ann@x.com", "",
            "Get User by ID", "x", "1",
            "Get User by ID", "5",
            "Get User by Email", "ann@x.com",
            "Get User by Email", "no@x.com",
            "Exit",
        ];
        let (out, script) = session(service(), &answers).await;

        assert!(script.asked.iter().any(|line| line.starts_with("invalid number:")));
        assert!(out.contains("User found: #1 Ann"));
        assert!(out.contains("User not found with ID: 5"));
        assert!(out.contains("User not found with email: no@x.com"));
    }

    #[tokio::test]
    async fn test_update_keeps_blank_fields() {
        let service = service();
        let answers = [
            "Create User", "Ann", "ann@x.com", "30",
            "Update User", "1", "", "", "31",
            "Update User", "9",
            "Exit",
        ];
        let (out, script) = session(service.clone(), &answers).await;

        assert!(script.saw("Name [Ann]"));
        assert!(script.saw("Age [30]"));
        assert!(out.contains("User updated successfully: #1 Ann <ann@x.com>, age 31"));
        assert!(out.contains("User not found with ID: 9"));

        let stored = service.get_by_id(1).await.unwrap().unwrap();
        assert_eq!(stored.age, Some(31));
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let service = service();
        let answers = [
            "Create User", "Ann", "ann@x.com", "",
            "Delete User", "1", "n",
            "Delete User", "1", "yes",
            "Delete User", "1",
            "Exit",
        ];
        let (out, _) = session(service.clone(), &answers).await;

        assert!(out.contains("Deletion cancelled."));
        assert!(out.contains("User deleted successfully."));
        assert!(out.contains("User not found with ID: 1"));
        assert!(service.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_submenu() {
        let answers = [
            "Create User", "Ann Lee", "ann@x.com", "25",
            "Create User", "Bea", "bea@x.com", "40",
            "Search Users", "Search by city", "Search by name", "ann",
            "Search Users", "Search by age range", "30", "50",
            "Search Users", "Search by age range", "50", "10",
            "Exit",
        ];
        let (out, script) = session(service(), &answers).await;

        assert!(script.saw("no such item: Search by city"));
        assert!(out.contains("1. #1 Ann Lee"));
        assert!(out.contains("1. #2 Bea"));
        assert!(out.contains("Error: Invalid input"));
    }

    #[tokio::test]
    async fn test_end_of_input_exits_cleanly() {
        let (out, _) = session(service(), &["Create User", "Ann"]).await;

        assert!(!out.contains("User created"));
        assert!(out.ends_with("Goodbye!\n"));
    }
}
