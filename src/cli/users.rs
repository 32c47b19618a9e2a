use anyhow::{anyhow, Result};

use super::display::{print_user_stats, print_users};
use super::session::{Session, View};
use super::ui::{ask, ask_parsed, confirm, non_empty, select, select_choice, select_value, status};
use super::{DeleteArgs, UserAddArgs, UserCommand, UserListArgs, UserUpdateArgs};
use crate::filter::{self, Choice, Search, UserFilter};
use crate::metrics::UserStats;
use crate::models::{EntityId, NewUser, User, UserPatch, UserStatus, DEPARTMENTS, ROLES};

/// Execute a `users` subcommand
pub fn run_users(session: &Session, command: UserCommand) -> Result<()> {
    let view = session.view();
    match command {
        UserCommand::List(args) => list(&view, &args),
        UserCommand::Add(args) => add(&view, args),
        UserCommand::Update(args) => update(&view, args),
        UserCommand::Delete(args) => delete(&view, args),
        UserCommand::Stats => stats(&view),
    }
}

pub fn user_filter(args: &UserListArgs) -> UserFilter {
    UserFilter {
        search: Search::new(&args.search),
        role: args.role.clone(),
        status: args.status.clone(),
    }
}

fn list(view: &View, args: &UserListArgs) -> Result<()> {
    let users = view.read(view.crm().users.list());
    let load_error = view.read(view.crm().users.last_error());
    let visible = filter::apply(&users, &user_filter(args));
    print_users(&visible, load_error.as_deref());
    println!();
    print_user_stats(&UserStats::compute(&users));
    Ok(())
}

fn stats(view: &View) -> Result<()> {
    if let Some(message) = view.read(view.crm().users.last_error()) {
        return Err(anyhow!(message));
    }
    let users = view.read(view.crm().users.list());
    print_user_stats(&UserStats::compute(&users));
    Ok(())
}

fn add(view: &View, args: UserAddArgs) -> Result<()> {
    let new = if args.is_empty() {
        match prompt_new_user()? {
            Some(new) => new,
            None => {
                status("Cancelled.");
                return Ok(());
            }
        }
    } else {
        new_user_from(args)
    };

    let user = view.run(view.crm().users.add(new))?;
    status(&format!("\nCreated: {} (#{})", user.name, user.id));
    Ok(())
}

fn update(view: &View, args: UserUpdateArgs) -> Result<()> {
    let current = find(view, args.id)?;
    let interactive =
        args.fields.is_empty() && args.leads_assigned.is_none() && args.leads_converted.is_none();
    let patch = if interactive {
        match prompt_user_patch(&current)? {
            Some(patch) => patch,
            None => {
                status("Cancelled.");
                return Ok(());
            }
        }
    } else {
        let mut patch = patch_from(args.fields);
        patch.leads_assigned = args.leads_assigned;
        patch.leads_converted = args.leads_converted;
        patch
    };

    if patch.is_empty() {
        status("No changes.");
        return Ok(());
    }
    match view.run(view.crm().users.update(args.id, patch))? {
        Some(_) => status("Saved."),
        None => return Err(not_found(args.id)),
    }
    Ok(())
}

fn delete(view: &View, args: DeleteArgs) -> Result<()> {
    let user = find(view, args.id)?;
    if !args.yes && !confirm(&format!("Remove {} from the team?", user.name))? {
        status("Cancelled.");
        return Ok(());
    }
    view.run(view.crm().users.remove(args.id))?;
    status("Deleted.");
    Ok(())
}

/// A user that is not loaded is reported with the load failure when there was one.
fn find(view: &View, id: EntityId) -> Result<User> {
    if let Some(user) = view.read(view.crm().users.get(id)) {
        return Ok(user);
    }
    match view.read(view.crm().users.last_error()) {
        Some(message) => Err(anyhow!(message)),
        None => Err(not_found(id)),
    }
}

fn not_found(id: EntityId) -> anyhow::Error {
    anyhow!("No user with id {}.", id)
}

pub fn new_user_from(args: UserAddArgs) -> NewUser {
    let defaults = NewUser::default();
    NewUser {
        name: args.name.unwrap_or_default(),
        email: args.email.unwrap_or_default(),
        phone: args.phone.unwrap_or_default(),
        role: args.role.unwrap_or_default(),
        department: args.department.unwrap_or(defaults.department),
        status: args.status.unwrap_or(defaults.status),
    }
}

pub fn patch_from(args: UserAddArgs) -> UserPatch {
    UserPatch {
        name: args.name,
        email: args.email,
        phone: args.phone,
        role: args.role,
        department: args.department,
        status: args.status,
        leads_assigned: None,
        leads_converted: None,
    }
}

fn prompt_new_user() -> Result<Option<NewUser>> {
    let Some(name) = ask("name", None)? else {
        return Ok(None);
    };
    let Some(email) = ask("email", None)? else {
        return Ok(None);
    };
    let Some(phone) = ask("phone", None)? else {
        return Ok(None);
    };
    let Some(role) = select_value("role", ROLES, |r| r.to_string())? else {
        return Ok(None);
    };
    let Some(department) = select_value("department", DEPARTMENTS, |d| d.to_string())? else {
        return Ok(None);
    };
    let Some(user_status) = select_value("status", UserStatus::ALL, |s| s.label())? else {
        return Ok(None);
    };

    Ok(Some(NewUser {
        name,
        email,
        phone,
        role: role.to_string(),
        department: department.to_string(),
        status: user_status,
    }))
}

fn prompt_user_patch(user: &User) -> Result<Option<UserPatch>> {
    let changed = |new: String, old: &str| non_empty(new).filter(|v| v != old);

    let Some(name) = ask("name", Some(&user.name))? else {
        return Ok(None);
    };
    let Some(email) = ask("email", Some(&user.email))? else {
        return Ok(None);
    };
    let Some(phone) = ask("phone", Some(&user.phone))? else {
        return Ok(None);
    };
    let Some(role) = ask("role", Some(&user.role))? else {
        return Ok(None);
    };
    let Some(department) = ask("department", Some(&user.department))? else {
        return Ok(None);
    };
    let Some(user_status) = ask_parsed("status", Some(user.status))? else {
        return Ok(None);
    };
    let Some(assigned) = ask_parsed("leads assigned", Some(user.leads_assigned))? else {
        return Ok(None);
    };
    let Some(converted) = ask_parsed("leads converted", Some(user.leads_converted))? else {
        return Ok(None);
    };

    Ok(Some(UserPatch {
        name: changed(name, &user.name),
        email: changed(email, &user.email),
        phone: changed(phone, &user.phone),
        role: changed(role, &user.role),
        department: changed(department, &user.department),
        status: Some(user_status).filter(|s| *s != user.status),
        leads_assigned: Some(assigned).filter(|n| *n != user.leads_assigned),
        leads_converted: Some(converted).filter(|n| *n != user.leads_converted),
    }))
}

// ============================================================================
// Interactive view
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Filter,
    Add,
    Edit,
    Delete,
    Reload,
    Back,
}

impl Action {
    const ALL: &'static [Action] = &[
        Action::Filter,
        Action::Add,
        Action::Edit,
        Action::Delete,
        Action::Reload,
        Action::Back,
    ];

    fn label(self) -> &'static str {
        match self {
            Action::Filter => "Search / filter",
            Action::Add => "Add user",
            Action::Edit => "Edit user",
            Action::Delete => "Delete user",
            Action::Reload => "Reload",
            Action::Back => "Back",
        }
    }
}

/// User management view for the interactive menu
pub fn browse(session: &Session) -> Result<()> {
    let view = session.view();
    let mut args = UserListArgs::default();

    loop {
        list(&view, &args)?;
        println!();

        let Some(action) = select_value("users", Action::ALL, |a| a.label().to_string())? else {
            return Ok(());
        };

        let result = match action {
            Action::Filter => prompt_filter(&mut args),
            Action::Add => add(&view, UserAddArgs::default()),
            Action::Edit => pick(&view, &args)?.map_or(Ok(()), |id| {
                update(
                    &view,
                    UserUpdateArgs {
                        id,
                        fields: UserAddArgs::default(),
                        leads_assigned: None,
                        leads_converted: None,
                    },
                )
            }),
            Action::Delete => pick(&view, &args)?
                .map_or(Ok(()), |id| delete(&view, DeleteArgs { id, yes: false })),
            // a failed reload is shown in place of the rows
            Action::Reload => {
                let _ = view.run(view.crm().users.refresh());
                Ok(())
            }
            Action::Back => return Ok(()),
        };
        if let Err(e) = result {
            eprintln!("\nError: {}", e);
        }
        println!();
    }
}

fn prompt_filter(args: &mut UserListArgs) -> Result<()> {
    if let Some(search) = ask("search", Some(&args.search))? {
        args.search = search;
    }
    if let Some(choice) = select_choice("role", ROLES, |r| r.to_string())? {
        args.role = match choice {
            Choice::All => Choice::All,
            Choice::Only(role) => Choice::Only(role.to_string()),
        };
    }
    if let Some(choice) = select_choice("status", UserStatus::ALL, |s| s.label())? {
        args.status = choice;
    }
    Ok(())
}

fn pick(view: &View, args: &UserListArgs) -> Result<Option<EntityId>> {
    let users = view.read(view.crm().users.list());
    let visible = filter::apply(&users, &user_filter(args));
    let labels: Vec<String> = visible
        .iter()
        .map(|u| format!("{} · {}", u.name, u.role))
        .collect();
    Ok(select("user", &labels)?.map(|idx| visible[idx].id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn test_new_user_from_flags_keeps_form_defaults() {
        let new = new_user_from(UserAddArgs {
            name: Some("Neha Gupta".into()),
            email: Some("neha@company.com".into()),
            role: Some("Sales Executive".into()),
            ..Default::default()
        });
        assert_eq!(new.department, "Sales");
        assert_eq!(new.status, UserStatus::Active);
    }

    #[test]
    fn test_patch_from_flags() {
        let patch = patch_from(UserAddArgs {
            status: Some(UserStatus::OnLeave),
            ..Default::default()
        });
        assert_eq!(patch.status, Some(UserStatus::OnLeave));
        assert_eq!(patch.name, None);
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({ "status": "on-leave" })
        );
    }

    #[test]
    fn test_role_filter_is_exact() {
        let args = UserListArgs {
            role: Choice::Only("Sales Executive".into()),
            ..Default::default()
        };
        let users = seed::users();
        let visible = filter::apply(&users, &user_filter(&args));
        // "Senior Sales Executive" is not an exact match
        assert!(visible.iter().all(|u| u.role == "Sales Executive"));
        assert_eq!(visible.len(), 2);
    }
}
