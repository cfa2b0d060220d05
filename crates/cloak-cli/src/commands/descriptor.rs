//! The `descriptor` command: build a protection descriptor from CLI
//! arguments and print it the way protected files are described.

use anyhow::{bail, Context};
use chrono::{Duration, Utc};

use cloak_core::descriptor::{
    ProtectionDescriptor, ProtectionDescriptorBuilder, ProtectionType, UserRights,
};

pub struct Options {
    pub template_id: Option<String>,
    pub grants: Vec<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub owner: Option<String>,
    pub expires_days: Option<i64>,
    pub no_offline_access: bool,
    pub referrer: Option<String>,
    pub json: bool,
}

/// Parse a grant in the `users:rights` syntax, both comma-separated,
/// e.g. `alice@contoso.com,bob@contoso.com:VIEW,EDIT`.
pub fn parse_grant(spec: &str) -> anyhow::Result<UserRights> {
    let (users, rights) = spec
        .split_once(':')
        .with_context(|| format!("grant needs <users>:<rights>: {spec}"))?;
    let users: Vec<String> = users
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect();
    let rights: Vec<String> = rights
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|r| r.to_ascii_uppercase())
        .collect();
    if users.is_empty() || rights.is_empty() {
        bail!("grant needs at least one user and one right: {spec}");
    }
    Ok(UserRights::new(users, rights))
}

pub fn build(options: &Options) -> anyhow::Result<ProtectionDescriptor> {
    let mut builder = match (&options.template_id, options.grants.is_empty()) {
        (Some(template_id), true) => ProtectionDescriptorBuilder::from_template(template_id),
        (None, false) => {
            let grants = options
                .grants
                .iter()
                .map(|g| parse_grant(g))
                .collect::<anyhow::Result<Vec<_>>>()?;
            ProtectionDescriptorBuilder::from_user_rights(grants)
        }
        (Some(_), false) => bail!("pass either --template-id or --grant, not both"),
        (None, true) => bail!("pass --template-id or at least one --grant"),
    };

    if let Some(name) = &options.name {
        builder.set_name(name);
    }
    if let Some(description) = &options.description {
        builder.set_description(description);
    }
    if let Some(owner) = &options.owner {
        builder.set_owner(owner);
    }
    if let Some(days) = options.expires_days {
        builder.set_content_valid_until(Utc::now() + Duration::days(days));
    }
    if options.no_offline_access {
        builder.set_allow_offline_access(false);
    }
    if let Some(referrer) = &options.referrer {
        builder.set_referrer(referrer);
    }

    Ok(builder.build()?)
}

fn print_text(descriptor: &ProtectionDescriptor) {
    match descriptor.protection_type() {
        ProtectionType::TemplateBased => println!("Protection: template."),
        ProtectionType::Custom => println!("Protection: custom permissions."),
    }
    println!("Name: {}", descriptor.name());
    println!("Template Id: {}", descriptor.template_id());
    println!("Content Id: {}", descriptor.content_id());
    if !descriptor.owner().is_empty() {
        println!("Owner: {}", descriptor.owner());
    }

    for grant in descriptor.user_rights() {
        println!("Rights: {}", grant.rights.join(", "));
        println!("For Users: {}", grant.users.join("; "));
    }

    if let Some(until) = descriptor.content_valid_until() {
        println!("Content Expiration (UTC): {}", until.format("%FT%TZ"));
    }
    println!(
        "Offline access: {}",
        if descriptor.does_allow_offline_access() {
            "allowed"
        } else {
            "denied"
        }
    );
    if let Some(referrer) = descriptor.referrer() {
        println!("Referrer: {referrer}");
    }
}

pub fn run(options: Options) -> anyhow::Result<()> {
    let descriptor = build(&options)?;
    if options.json {
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
    } else {
        print_text(&descriptor);
    }
    Ok(())
}
