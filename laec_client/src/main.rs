//! Command-line client for the LAEC lab scheduler.
//!
//! Signs in against the gateway, keeps the session on disk between runs,
//! browses turmas, grupos and aulas, and offers an interactive shell in
//! which the inactivity timeout is enforced.

use anyhow::{Context, Result, bail};
use laec::{
    ActivityKind, AppContext, InactivityEvent, NavigationIntent, Page,
    auth::RegisterRequest,
    routing::{Navigation, Resolution, post_login_destination},
    services::{Usuario, group_by_period},
};
use laec_client::{
    commands::{self, Command, ShellCommand, parse_shell_line},
    config::ClientConfig,
    logging::{self, log_security_event},
};
use pico_args::Arguments;
use std::io::{self, Write};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::{broadcast::error::RecvError, mpsc::UnboundedReceiver},
};

const HELP: &str = "\
Command-line client for the LAEC lab scheduler

USAGE:
  laec_client [OPTIONS] COMMAND

COMMANDS:
  login       [--username NAME] [--password PASS] [--remember]
  register    --nome NAME --email EMAIL [--password PASS] [--tipo ROLE]
              [--curso C] [--periodo P] [--telefone T]
  logout
  whoami
  open        PATH          Resolve a page the way the web shell would
  turmas      [--ano YEAR]
  grupos      --turma ID
  prioridade  --turma ID    Priority order for the next aula
  aulas       --turma ID
  usuarios    [--tipo ROLE]
  shell                     Interactive session with inactivity timeout

OPTIONS:
  --api URL             Gateway URL  [env: LAEC_API_URL, default: http://localhost:8080]
  --storage FILE        Session file [env: LAEC_STORAGE_PATH]

FLAGS:
  -h, --help            Print help information
";

const SHELL_HELP: &str = "\
  open PATH   navigate to a page
  extend      stay signed in
  whoami      show the signed-in user
  logout      sign out
  quit        leave the shell
";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let mut pargs = Arguments::from_env();
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let cli = match commands::parse_args(pargs) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    logging::init();

    let config = ClientConfig::from_env(cli.api_url, cli.storage)?;
    let settings = config.app_settings()?;
    tracing::debug!(api_url = %settings.api_url, storage = %settings.storage_path.display(), "Configuration loaded");

    let (app, mut navigation) =
        AppContext::start(&settings).context("Failed to start the client")?;

    let result = run(&app, &mut navigation, cli.command).await;
    drain_navigation(&mut navigation);
    app.shutdown();
    result
}

async fn run(
    app: &AppContext,
    navigation: &mut UnboundedReceiver<NavigationIntent>,
    command: Command,
) -> Result<()> {
    match command {
        Command::Login {
            username,
            password,
            remember,
        } => {
            let username = username.unwrap_or_else(whoami::username);
            let password = match password {
                Some(password) => password,
                None => prompt(&format!("Password for {username}: "))?,
            };

            let user = match app.session().login(&username, &password, remember).await {
                Ok(user) => user,
                Err(e) => {
                    log_security_event(
                        "failed_login",
                        None,
                        &format!("Login failed for {username}: {e}"),
                    );
                    bail!(e.client_message());
                }
            };

            println!("Signed in as {} <{}> ({})", user.name, user.email, user.role);
            println!("Continue at {}", post_login_destination(None, user.role));
        }

        Command::Register(args) => {
            let password = match args.password {
                Some(password) => password,
                None => prompt("Choose a password: ")?,
            };
            let request = RegisterRequest {
                name: args.name,
                email: args.email,
                password,
                role: args.role,
                curso: args.curso,
                periodo: args.periodo,
                telefone: args.telefone,
            };

            let user = app
                .session()
                .register(&request)
                .await
                .map_err(|e| anyhow::anyhow!(e.client_message()))?;
            println!("Account created. Signed in as {} ({})", user.name, user.role);
        }

        Command::Logout => {
            if app.session().is_authenticated() {
                app.session().logout();
                println!("Signed out");
            } else {
                println!("Not signed in");
            }
        }

        Command::Whoami => print_whoami(app),

        Command::Open { path } => open(app, &path)?,

        Command::Turmas { ano } => {
            ensure_signed_in(app)?;
            let turmas = match ano {
                Some(ano) => app.turmas().by_year(ano).await,
                None => app.turmas().list().await,
            }
            .map_err(|e| anyhow::anyhow!(e.client_message()))?;

            if turmas.is_empty() {
                println!("No turmas");
            }
            for group in group_by_period(turmas) {
                println!("{} - {}", group.ano, group.semestre.label());
                for turma in &group.turmas {
                    println!("  #{:<4} {}", turma.turma_id, turma);
                }
            }
        }

        Command::Grupos { turma } => {
            ensure_signed_in(app)?;
            let grupos = app
                .grupos()
                .by_turma(turma)
                .await
                .map_err(|e| anyhow::anyhow!(e.client_message()))?;

            println!(
                "{:<6} {:<20} {:>10} {:>6} {:>7} {:>6}",
                "ID", "GRUPO", "PRIORIDADE", "AULAS", "FALTAS", "ATIVO"
            );
            for grupo in grupos {
                println!(
                    "{:<6} {:<20} {:>10} {:>6} {:>7} {:>6}",
                    grupo.grupo_id,
                    grupo.display_name(),
                    grupo.prioridade_atual,
                    grupo.total_aulas(),
                    grupo.total_faltas,
                    if grupo.ativo { "sim" } else { "não" }
                );
            }
        }

        Command::Prioridade { turma } => {
            ensure_signed_in(app)?;
            let prioridade = app
                .grupos()
                .priority_for_next_aula(turma)
                .await
                .map_err(|e| anyhow::anyhow!(e.client_message()))?;

            for grupo in &prioridade.grupos_ordenados {
                let name = grupo
                    .nome_grupo
                    .clone()
                    .unwrap_or_else(|| format!("Grupo {}", grupo.numero_grupo));
                println!(
                    "{:>2}. {:<20} turno {}  {}",
                    grupo.ordem_sugerida, name, grupo.turno_sugerido, grupo.motivo_prioridade
                );
            }
            if !prioridade.explicacao.is_empty() {
                println!("{}", prioridade.explicacao);
            }
        }

        Command::Aulas { turma } => {
            ensure_signed_in(app)?;
            let aulas = app
                .aulas()
                .by_turma(turma)
                .await
                .map_err(|e| anyhow::anyhow!(e.client_message()))?;

            if aulas.is_empty() {
                println!("No aulas scheduled");
            }
            for aula in aulas {
                println!(
                    "{}  aula {}  {}  ({} presentes, {} faltas)",
                    aula.data_aula.format("%d/%m/%Y"),
                    aula.numero_aula
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    aula.tema.as_deref().unwrap_or(""),
                    aula.count_present(),
                    aula.count_absent()
                );
                for turno in [1, 2] {
                    let grupos: Vec<String> = aula
                        .groups_in_shift(turno)
                        .iter()
                        .map(|g| match (&g.nome_grupo, g.numero_grupo) {
                            (Some(name), _) => name.clone(),
                            (None, Some(n)) => format!("Grupo {n}"),
                            (None, None) => format!("#{}", g.grupo_id),
                        })
                        .collect();
                    if !grupos.is_empty() {
                        println!("    {}º turno: {}", turno, grupos.join(", "));
                    }
                }
            }
        }

        Command::Usuarios { tipo } => {
            ensure_signed_in(app)?;
            let usuarios = match tipo {
                Some(role) => app.usuarios().by_role(role).await,
                None => app.usuarios().list().await,
            }
            .map_err(|e| anyhow::anyhow!(e.client_message()))?;
            print_usuarios(&usuarios);
        }

        Command::Shell => shell(app, navigation).await?,
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn ensure_signed_in(app: &AppContext) -> Result<()> {
    app.session().enforce_expiry();
    if !app.session().is_authenticated() {
        bail!("Not signed in. Run `laec_client login` first.");
    }
    Ok(())
}

fn print_whoami(app: &AppContext) {
    app.session().enforce_expiry();
    match app.session().current_user() {
        Some(user) => println!("{} <{}> ({}, id {})", user.name, user.email, user.role, user.id),
        None => println!("Not signed in"),
    }
}

fn print_usuarios(usuarios: &[Usuario]) {
    for usuario in usuarios {
        println!(
            "{:<6} {:<28} {:<32} {:<10} {}",
            usuario.id,
            usuario.nome,
            usuario.email,
            usuario.tipo.as_str(),
            if usuario.ativo { "ativo" } else { "inativo" }
        );
    }
}

fn open(app: &AppContext, url: &str) -> Result<()> {
    let requested = url.split(['?', '#']).next().unwrap_or_default();
    let guarded = Page::ALL.iter().any(|page| page.path() == requested);

    if guarded && app.session().is_authenticated() {
        if let Resolution::Redirect(intent) = app.router().resolve(app.session().as_ref(), url) {
            let user_id = app.session().current_user().map(|u| u.id);
            log_security_event(
                "access_denied",
                user_id,
                &format!("{} redirected to {}", requested, intent.path),
            );
        }
    }

    let navigation = app.open(url)?;
    print_navigation(&navigation);
    Ok(())
}

fn print_navigation(navigation: &Navigation) {
    println!("{} ({})", navigation.page.title(), navigation.intent);
}

fn drain_navigation(navigation: &mut UnboundedReceiver<NavigationIntent>) {
    while let Ok(intent) = navigation.try_recv() {
        tracing::debug!("Navigation requested: {}", intent);
    }
}

fn format_remaining(seconds: u64) -> String {
    if seconds >= 60 {
        format!("{}:{:02}", seconds / 60, seconds % 60)
    } else {
        format!("{seconds}s")
    }
}

async fn shell(
    app: &AppContext,
    navigation: &mut UnboundedReceiver<NavigationIntent>,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut events = app.monitor().subscribe();
    let mut signed_in_as = app.session().current_user().map(|u| u.id);

    println!("LAEC shell. Type `help` for commands.");
    print_whoami(app);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                app.monitor().record_activity(ActivityKind::KeyPress);

                match parse_shell_line(&line) {
                    Ok(ShellCommand::Quit) => break,
                    Ok(ShellCommand::Noop) => {}
                    Ok(ShellCommand::Help) => print!("{SHELL_HELP}"),
                    Ok(ShellCommand::Whoami) => print_whoami(app),
                    Ok(ShellCommand::Extend) => {
                        if app.monitor().is_monitoring() {
                            app.monitor().extend_session();
                            println!("Session extended");
                        } else {
                            println!("Not signed in");
                        }
                    }
                    Ok(ShellCommand::Logout) => app.session().logout(),
                    Ok(ShellCommand::Open(url)) => {
                        if let Err(e) = open(app, &url) {
                            println!("{e}");
                        }
                    }
                    Err(e) => println!("{e}"),
                }
                signed_in_as = app.session().current_user().map(|u| u.id);
            }

            event = events.recv() => match event {
                Ok(InactivityEvent::Warning { seconds_remaining }) => {
                    if seconds_remaining % 60 == 0 || seconds_remaining <= 10 {
                        println!(
                            "Session ends in {} due to inactivity. Type `extend` to stay signed in.",
                            format_remaining(seconds_remaining)
                        );
                    }
                }
                Ok(InactivityEvent::Timeout) => {
                    log_security_event(
                        "inactivity_logout",
                        signed_in_as.take(),
                        "Session ended after inactivity",
                    );
                    println!("Signed out due to inactivity");
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("Skipped {} inactivity events", skipped);
                }
                Err(RecvError::Closed) => break,
            },

            Some(intent) = navigation.recv() => {
                match app.open(&intent.to_string()) {
                    Ok(resolved) => print_navigation(&resolved),
                    Err(e) => println!("{e}"),
                }
            }
        }
    }

    Ok(())
}
