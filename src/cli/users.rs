use crate::db::Database;
use crate::error::Result;
use crate::models::User;
use crate::repository::UserStore;

fn print_user(user: &User) {
    println!("{}\t{}\t{}", user.id, user.name, user.email);
}

pub fn show(db: &Database, id: i64) -> Result<()> {
    db.init()?;
    print_user(&db.get_user(id)?);
    Ok(())
}

pub fn find(db: &Database, email: &str) -> Result<()> {
    db.init()?;
    print_user(&db.get_user_by_email(email)?);
    Ok(())
}

pub fn update(db: &Database, id: i64, name: &str, email: &str) -> Result<()> {
    db.init()?;
    let user = User::new(id, name, email);
    db.update_user(&user)?;
    println!("Updated user {id}");
    Ok(())
}
