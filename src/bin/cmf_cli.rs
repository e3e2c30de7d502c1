#[cfg(target_arch = "wasm32")]
fn main() {
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("cmf_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use cmf_engine::families::{Family, FamilyRegistry, Output, ParamMap, ParamValue, Representation};
    use cmf_engine::family_catalog;
    use std::fs;
    use std::path::{Path, PathBuf};

    const USAGE: &str = r#"cmf_cli (cmf-engine)

USAGE:
  cmf_cli list
  cmf_cli compute <family> [options]

FAMILIES:
  lms      lms-mb   lms-mw
  xyz      xy       xyz-p    xy-p
  xyz-std  xy-std

OPTIONS (compute):
  --field-size <deg>   Field size in degrees (default 2; standard families accept 2 or 10)
  --age <years>        Observer age (default 32; not accepted by standard families)
  --min <nm>           Lower domain bound (default 390)
  --max <nm>           Upper domain bound (default 830)
  --step <nm>          Step size (default 1)
  --log                log10 of the values (lms)
  --base               Nine significant figures (lms)
  --norm               Equal-area normalisation (xyz family)
  --info               Metadata instead of a table
  --plot               Unrounded companion table on a 0.1 nm grid
  --pretty             Indented JSON
  --out <path>         Write JSON to a file instead of stdout
  --overwrite          Allow --out to replace an existing file
"#;

    const DEFAULT_FIELD_SIZE: f64 = 2.0;
    const DEFAULT_AGE: i64 = 32;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "list" => print_families(),
            "compute" => cmd_compute(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn print_families() -> Result<(), String> {
        for entry in family_catalog() {
            let flags = if entry.flags.is_empty() {
                "-".to_owned()
            } else {
                entry.flags.join(",")
            };
            println!("{:<8} flags: {:<14} aliases: {}", entry.name, flags, entry.aliases.join(", "));
        }
        Ok(())
    }

    struct ComputeOptions {
        family: Family,
        params: ParamMap,
        plot: bool,
        pretty: bool,
        out: Option<PathBuf>,
        overwrite: bool,
    }

    fn parse_number(flag: &str, text: &str) -> Result<f64, String> {
        text.trim()
            .parse::<f64>()
            .map_err(|_| format!("{flag} expects a number, got `{text}`"))
    }

    fn parse_compute(args: &mut Args) -> Result<Option<ComputeOptions>, String> {
        let family_name = args.next().ok_or("missing family name")?;
        let family = FamilyRegistry::default()
            .resolve(&family_name)
            .map_err(|err| err.to_string())?;

        let mut params = ParamMap::new();
        let mut options = ComputeOptions {
            family,
            params: ParamMap::new(),
            plot: false,
            pretty: false,
            out: None,
            overwrite: false,
        };

        while let Some(arg) = args.next() {
            let key = match arg.as_str() {
                "--field-size" => "field_size",
                "--age" => "age",
                "--min" => "min",
                "--max" => "max",
                "--step" => "step_size",
                "--log" | "--base" | "--norm" | "--info" => {
                    params.insert(arg.trim_start_matches("--").to_owned(), ParamValue::Boolean(true));
                    continue;
                }
                "--plot" => {
                    options.plot = true;
                    continue;
                }
                "--pretty" => {
                    options.pretty = true;
                    continue;
                }
                "--out" => {
                    options.out = Some(PathBuf::from(args.value("--out")?));
                    continue;
                }
                "--overwrite" => {
                    options.overwrite = true;
                    continue;
                }
                "-h" | "--help" => {
                    print_usage();
                    return Ok(None);
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            };
            let value = parse_number(&arg, &args.value(&arg)?)?;
            params.insert(key.to_owned(), ParamValue::Number(value));
        }

        params
            .entry("field_size".to_owned())
            .or_insert(ParamValue::Number(DEFAULT_FIELD_SIZE));
        if !family.is_standard() {
            params
                .entry("age".to_owned())
                .or_insert(ParamValue::Integer(DEFAULT_AGE));
        }
        options.params = params;
        Ok(Some(options))
    }

    fn cmd_compute(args: &mut Args) -> Result<(), String> {
        let Some(options) = parse_compute(args)? else {
            return Ok(());
        };

        let request = Representation::from_params(options.family, &options.params)
            .map_err(|err| err.to_string())?;
        let output = if options.plot {
            request.compute_plot()
        } else {
            request.compute()
        }
        .map_err(|err| err.to_string())?;

        let json = if options.pretty {
            serde_json::to_string_pretty(&output)
        } else {
            serde_json::to_string(&output)
        }
        .map_err(|e| format!("serialize output: {e}"))?;

        match options.out.as_deref() {
            Some(path) => {
                write_text_file(path, &json, options.overwrite)?;
                eprintln!("wrote {}", path.display());
            }
            None => println!("{json}"),
        }
        eprintln!("{}: {}", options.family, summary(&output));
        Ok(())
    }

    fn summary(output: &Output) -> String {
        match output {
            Output::Table(table) if table.dropped.is_empty() => format!("rows={}", table.table.len()),
            Output::Table(table) => format!(
                "rows={} dropped={}",
                table.table.len(),
                table.dropped.len()
            ),
            Output::Purples(purples) => format!("purple rows={}", purples.table.len()),
            Output::Info(_) => "info".to_owned(),
        }
    }

    fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        let mut text = text.to_owned();
        if !text.ends_with('\n') {
            text.push('\n');
        }
        fs::write(path, text).map_err(|e| format!("write {}: {e}", path.display()))
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }
    }
}
