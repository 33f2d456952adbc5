
use std::f64::consts::FRAC_PI_2;

use ork::{
    AbortCause, AltitudeReference, AtmosphereModel, ConfigValue, DesignDocument, ExtensionConfig,
    ExtensionProvider, FlightEventType, GeodeticMethod, ImportContext, ImportOptions,
    SimulationExtension, SimulationStatus, WarningKind, WarningSet, WindModelType,
};
use test_helpers::*;

fn with_body(rocket_extra: &str) -> String {
    format!(
        "{rocket_extra}{}",
        single_stage("<bodytube><name>Body</name><id>body-id</id></bodytube>")
    )
}

#[test]
fn full_simulation() {
    let xml = document(
        &with_body(r#"<motorconfiguration configid="c1"/>"#),
        r#"<simulations>
             <simulation status="uptodate">
               <name>Flight 1</name>
               <simulator>RK4Simulator</simulator>
               <calculator>BarrowmanCalculator</calculator>
               <listener>net.example.Logger</listener>
               <conditions>
                 <configid>c1</configid>
                 <launchrodlength>1.5</launchrodlength>
                 <launchrodangle>90</launchrodangle>
                 <launchroddirection>0</launchroddirection>
                 <wind model="average">
                   <speed>4</speed>
                   <direction>0.5</direction>
                   <standarddeviation>1</standarddeviation>
                 </wind>
                 <launchaltitude>100</launchaltitude>
                 <launchlatitude>45</launchlatitude>
                 <launchlongitude>10</launchlongitude>
                 <geodeticmethod>spherical</geodeticmethod>
                 <atmosphere model="extendedisa">
                   <basetemperature>300</basetemperature>
                   <basepressure>100000</basepressure>
                 </atmosphere>
                 <timestep>0.01</timestep>
                 <maxtime>600</maxtime>
               </conditions>
               <flightdata maxaltitude="999">
                 <warning type="LargeAOA" priority="high"><parameter>0.31</parameter></warning>
                 <warning>Some old warning</warning>
                 <databranch name="Sustainer" types="Time,Altitude,Total velocity">
                   <event time="0" type="launch"/>
                   <event time="3" type="apogee" source="body-id"/>
                   <event time="4" type="simabort" cause="noliftoff"/>
                   <datapoint>0,0,0</datapoint>
                   <datapoint>1,50,80</datapoint>
                   <datapoint>2,60</datapoint>
                   <datapoint>3,120,10</datapoint>
                 </databranch>
               </flightdata>
             </simulation>
           </simulations>"#,
    );
    let loaded = load(&xml);

    assert!(loaded.warnings.mentions("did not contain correct amount of values"));
    assert_eq!(loaded.warnings.len(), 1, "{:?}", warning_texts(&loaded));

    let doc = &loaded.document;
    assert_eq!(doc.simulations.len(), 1);
    let sim = &doc.simulations[0];
    assert_eq!(sim.name, "Flight 1");
    assert_eq!(sim.status, SimulationStatus::UpToDate);
    assert_eq!(sim.simulator.as_deref(), Some("RK4Simulator"));
    assert_eq!(sim.calculator.as_deref(), Some("BarrowmanCalculator"));
    assert_eq!(sim.listeners, ["net.example.Logger"]);

    let options = &sim.options;
    assert_eq!(options.configuration_id, Some(config_id("c1")));
    assert_eq!(options.launch.rod_length, 1.5);
    assert!((options.launch.rod_angle - FRAC_PI_2).abs() < 1e-12);
    assert_eq!(options.launch.rod_direction, 0.0);
    assert_eq!(options.launch.altitude, 100.0);
    assert_eq!(options.launch.latitude, 45.0);
    assert_eq!(options.launch.longitude, 10.0);
    assert_eq!(options.launch.geodetic_method, GeodeticMethod::Spherical);
    assert_eq!(
        options.atmosphere,
        AtmosphereModel::ExtendedIsa {
            base_temperature: 300.0,
            base_pressure: 100_000.0
        }
    );
    assert_eq!(options.wind.model, WindModelType::Average);
    assert_eq!(options.wind.average.speed, 4.0);
    assert_eq!(options.wind.average.direction, 0.5);
    assert_eq!(options.wind.average.turbulence_intensity, 0.25);
    assert_eq!(options.time_step, 0.01);
    assert_eq!(options.max_time, 600.0);

    let data = sim.flight_data.as_ref().unwrap();
    assert_eq!(data.warnings().len(), 2);
    let large_aoa = data.warnings().iter().next().unwrap();
    assert_eq!(large_aoa.kind, WarningKind::LargeAngleOfAttack);
    assert_eq!(large_aoa.parameter, Some(0.31));
    assert!(data.warnings().mentions("Some old warning"));

    let branch = &data.branches()[0];
    assert_eq!(branch.name(), "Sustainer");
    assert_eq!(branch.len(), 3);
    assert_eq!(branch.get("Altitude"), Some(&[0.0, 50.0, 120.0][..]));

    let events = branch.events();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].kind, FlightEventType::Launch);
    assert_eq!(events[1].kind, FlightEventType::Apogee);
    assert_eq!(events[1].time, 3.0);
    assert_eq!(events[1].source.as_ref().map(|id| id.as_str()), Some("body-id"));
    assert_eq!(events[2].kind, FlightEventType::SimAbort);
    assert_eq!(events[2].abort_cause, Some(AbortCause::NoLiftoff));

    // Sampled data wins over the stored attribute summary.
    assert_eq!(data.summary().max_altitude, 120.0);
    assert_eq!(data.summary().time_to_apogee, 3.0);

    assert!(doc.storage.save_simulation_data);
    assert!(!doc.storage.explicitly_set);

    let configuration = doc.rocket.configurations().get(&config_id("c1")).unwrap();
    assert_eq!(sim.simulated_mod_id(), Some(configuration.mod_id()));
}

#[test]
fn event_problems() {
    let xml = document(
        &with_body(""),
        r#"<simulations><simulation status="loaded">
             <conditions/>
             <flightdata>
               <databranch name="Sustainer" types="Time,Altitude">
                 <event time="1" type="burnout" source="nope"/>
                 <event time="2" type="warpjump"/>
                 <event time="3" type="simabort" cause="gremlins"/>
                 <datapoint>0,x</datapoint>
                 <datapoint>1,5</datapoint>
               </databranch>
             </flightdata>
           </simulation></simulations>"#,
    );
    let loaded = load(&xml);

    assert!(loaded.warnings.mentions("Event source component 'nope' not found"));
    assert!(loaded.warnings.mentions("Illegal event specification"));
    assert!(loaded.warnings.mentions("Unknown abort cause 'gremlins'"));
    assert!(loaded.warnings.mentions("Data point format error"));
    assert_eq!(loaded.warnings.len(), 4);

    let sim = &loaded.document.simulations[0];
    assert_eq!(sim.status, SimulationStatus::Loaded);
    let branch = &sim.flight_data.as_ref().unwrap().branches()[0];
    assert_eq!(branch.len(), 1);
    let events = branch.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].source, None);
    assert_eq!(events[1].abort_cause, None);
}

#[test]
fn multilevel_wind() {
    let xml = document(
        "",
        r#"<simulations><simulation status="outdated"><conditions>
             <wind model="multilevel" altituderef="agl">
               <windlevel altitude="500" speed="8" direction="1"/>
               <windlevel altitude="0" speed="3" direction="1" standarddeviation="0.3"/>
               <windlevel altitude="high" speed="1" direction="0"/>
             </wind>
             <windmodeltype>multilevel</windmodeltype>
             <wind model="hurricane"><speed>90</speed></wind>
           </conditions></simulation></simulations>"#,
    );
    let loaded = load(&xml);

    assert!(loaded.warnings.mentions("Illegal wind level specification"));
    assert!(loaded.warnings.mentions("Unknown wind model 'hurricane'"));
    assert_eq!(loaded.warnings.len(), 2);

    let wind = &loaded.document.simulations[0].options.wind;
    assert_eq!(wind.model, WindModelType::Multilevel);
    assert_eq!(wind.multilevel.altitude_reference, AltitudeReference::Agl);
    let altitudes: Vec<f64> = wind.multilevel.levels.iter().map(|l| l.altitude).collect();
    assert_eq!(altitudes, [0.0, 500.0]);
    assert_eq!(wind.multilevel.levels[0].standard_deviation, 0.3);
    assert_eq!(wind.multilevel.levels[1].standard_deviation, 0.0);
}

#[test]
fn legacy_wind_fields() {
    let xml = document(
        "",
        r#"<simulations><simulation status="outdated"><conditions>
             <windaverage>5</windaverage>
             <windturbulence>0.2</windturbulence>
             <launchrodangle>NaN</launchrodangle>
             <atmosphere model="mars"/>
           </conditions></simulation></simulations>"#,
    );
    let loaded = load(&xml);

    assert!(loaded.warnings.mentions("Illegal launch rod angle defined"));
    assert!(loaded.warnings.mentions("Unknown atmospheric model"));
    let options = &loaded.document.simulations[0].options;
    assert_eq!(options.wind.average.speed, 5.0);
    assert_eq!(options.wind.average.turbulence_intensity, 0.2);
    assert_eq!(options.launch.rod_angle, 0.0);
    assert_eq!(options.atmosphere, AtmosphereModel::Isa);
}

#[test]
fn status_and_defaults() {
    let xml = document(
        "",
        r#"<simulations>
             <simulation status="bogus"><simulator>EulerSimulator</simulator></simulation>
             <simulation status="loaded"><name>No data</name><conditions/></simulation>
           </simulations>"#,
    );
    let loaded = load(&xml);

    assert!(loaded.warnings.mentions("Simulation status unknown, assuming outdated."));
    assert!(loaded.warnings.mentions("Simulation conditions not defined, using defaults."));
    assert!(loaded.warnings.mentions("Unknown simulator 'EulerSimulator'"));
    assert_eq!(loaded.warnings.len(), 3);

    let sims = &loaded.document.simulations;
    assert_eq!(sims[0].name, "Simulation");
    assert_eq!(sims[0].status, SimulationStatus::Outdated);
    assert_eq!(sims[0].simulator, None);
    assert_eq!(sims[0].options.time_step, 0.05);
    assert_eq!(sims[1].status, SimulationStatus::Outdated);
    assert!(!loaded.document.storage.save_simulation_data);
}

#[test]
fn flat_summary_without_branches() {
    let xml = document(
        "",
        r#"<simulations><simulation status="loaded"><conditions/>
             <flightdata maxaltitude="312.5" flighttime="20" maxmach="bad"/>
           </simulation></simulations>"#,
    );

    let loaded = load(&xml);
    let sim = &loaded.document.simulations[0];
    assert_eq!(sim.status, SimulationStatus::Loaded);
    let data = sim.flight_data.as_ref().unwrap();
    assert!(data.branches().is_empty());
    assert_eq!(data.summary().max_altitude, 312.5);
    assert_eq!(data.summary().flight_time, 20.0);
    assert!(data.summary().max_mach.is_nan());
    assert!(data.summary().max_velocity.is_nan());
    assert!(!loaded.document.storage.save_simulation_data);

    let options = ImportOptions {
        legacy_flight_data_summary: false,
        ..Default::default()
    };
    let loaded = load_with(&xml, &ImportContext::default().with_options(options));
    let data = loaded.document.simulations[0].flight_data.as_ref().unwrap();
    assert!(data.summary().max_altitude.is_nan());
}

#[test]
fn empty_branches() {
    let xml = document(
        "",
        r#"<simulations><simulation status="loaded"><conditions/>
             <flightdata maxaltitude="50">
               <databranch name="Empty" types="Time"/>
               <databranch name="Broken"/>
             </flightdata>
           </simulation></simulations>"#,
    );

    let loaded = load(&xml);
    assert!(loaded.warnings.mentions("Illegal flight data definition"));
    let data = loaded.document.simulations[0].flight_data.as_ref().unwrap();
    assert!(data.branches().is_empty());
    assert_eq!(data.summary().max_altitude, 50.0);

    let options = ImportOptions::from_toml_str("keep_empty_branches = true").unwrap();
    let loaded = load_with(&xml, &ImportContext::default().with_options(options));
    let data = loaded.document.simulations[0].flight_data.as_ref().unwrap();
    assert_eq!(data.branches().len(), 1);
    assert!(!data.has_samples());
    assert!(data.summary().max_altitude.is_nan());
}

#[test]
fn stored_extensions_keep_their_entries() {
    let xml = document(
        "",
        r#"<simulations><simulation status="outdated"><conditions/>
             <extension extensionid="com.example.AirStart">
               <entry key="altitude" type="number">1000</entry>
               <entry key="enabled" type="boolean">true</entry>
               <entry key="count" type="integer">3</entry>
               <entry key="label" type="string">high</entry>
               <entry key="angles" type="list">
                 <entry type="number">0.5</entry>
                 <entry type="integer">1</entry>
               </entry>
               <entry key="broken" type="integer">many</entry>
             </extension>
             <extension><entry key="x" type="string">y</entry></extension>
           </simulation></simulations>"#,
    );
    let loaded = load(&xml);

    assert!(loaded.warnings.mentions("Illegal integer value 'many'"));
    assert!(loaded.warnings.mentions("Simulation extension without an id"));
    assert_eq!(loaded.warnings.len(), 2);

    let extensions = &loaded.document.simulations[0].extensions;
    assert_eq!(extensions.len(), 1);
    let extension = &extensions[0];
    assert_eq!(extension.id(), "com.example.AirStart");

    let config = extension.config();
    assert_eq!(config.get("altitude"), Some(&ConfigValue::Number(1000.0)));
    assert_eq!(config.get("enabled"), Some(&ConfigValue::Bool(true)));
    assert_eq!(config.get("count"), Some(&ConfigValue::Integer(3)));
    assert_eq!(config.get("label"), Some(&ConfigValue::String("high".into())));
    assert_eq!(
        config.get("angles"),
        Some(&ConfigValue::List(vec![
            ConfigValue::Number(0.5),
            ConfigValue::Integer(1)
        ]))
    );
    assert!(!config.contains_key("broken"));
}

#[derive(Debug)]
struct Census {
    config: ExtensionConfig,
}

impl SimulationExtension for Census {
    fn id(&self) -> &str {
        "census"
    }

    fn config(&self) -> &ExtensionConfig {
        &self.config
    }

    fn document_loaded(&mut self, document: &DesignDocument, warnings: &mut WarningSet) {
        warnings.add_str(format!(
            "census: {} simulations, frozen {}",
            document.simulations.len(),
            document.is_frozen()
        ));
    }
}

struct CensusOnly;

impl ExtensionProvider for CensusOnly {
    fn create(&self, id: &str, config: ExtensionConfig) -> Option<Box<dyn SimulationExtension>> {
        (id == "census").then(|| Box::new(Census { config }) as Box<dyn SimulationExtension>)
    }
}

#[test]
fn extensions_see_the_loaded_document() {
    let xml = document(
        "",
        r#"<simulations><simulation status="outdated"><conditions/>
             <extension extensionid="census"/>
             <extension extensionid="missing"/>
           </simulation></simulations>"#,
    );
    let loaded = load_with(&xml, &ImportContext::default().with_extensions(CensusOnly));

    assert!(loaded.warnings.mentions("Simulation extension 'missing' is not available"));
    assert!(loaded.warnings.mentions("census: 1 simulations, frozen false"));
    assert_eq!(loaded.document.simulations[0].extensions.len(), 1);
    assert!(loaded.document.is_frozen());
}

#[test]
fn custom_expressions_name_data_types() {
    let xml = document(
        "",
        r#"<datatypes>
             <type source="customexpression">
               <name>Kinetic energy</name><symbol>Ek</symbol><unit>J</unit>
               <expression>0.5*m*Vt^2</expression>
             </type>
             <type source="builtin"><name>Altitude</name></type>
             <type source="customexpression"><name>Nothing</name></type>
           </datatypes>
           <simulations><simulation status="loaded"><conditions/>
             <customexpressions>
               <expression><name>Kinetic energy</name><expressionstring>m</expressionstring></expression>
               <expression><name>Drag power</name><expressionstring>Fd*Vt</expressionstring></expression>
             </customexpressions>
             <flightdata>
               <databranch name="Sustainer" types="Time,Kinetic energy,Drag power,Flux">
                 <datapoint>0,1,2,3</datapoint>
               </databranch>
             </flightdata>
           </simulation></simulations>"#,
    );
    let loaded = load(&xml);

    assert!(loaded.warnings.mentions("Illegal custom expression"));
    assert_eq!(loaded.warnings.len(), 1);

    let doc = &loaded.document;
    assert_eq!(doc.custom_expressions.len(), 2);
    assert_eq!(doc.custom_expression("Kinetic energy").unwrap().expression, "0.5*m*Vt^2");
    assert_eq!(doc.custom_expression("Drag power").unwrap().symbol, "Drag power");

    let branch = &doc.simulations[0].flight_data.as_ref().unwrap().branches()[0];
    let types = branch.types();
    assert!(types[0].builtin);
    assert_eq!(types[0].symbol, "t");
    assert_eq!((types[1].symbol.as_str(), types[1].unit.as_str()), ("Ek", "J"));
    assert!(!types[1].builtin);
    assert_eq!(types[2].symbol, "Drag power");
    assert_eq!((types[3].name.as_str(), types[3].unit.as_str()), ("Flux", ""));
}

#[test]
fn mod_id_falls_back_to_default_configuration() {
    let xml = document(
        r#"<motorconfiguration configid="c1"/><motorconfiguration configid="c2" default="true"/>"#,
        r#"<simulations>
             <simulation status="outdated"><conditions/></simulation>
             <simulation status="outdated"><conditions><configid>c1</configid></conditions></simulation>
           </simulations>
           <simulations/>"#,
    );
    let loaded = load(&xml);

    assert!(loaded.warnings.mentions("Multiple <simulations> sections"));
    let configurations = loaded.document.rocket.configurations();
    let sims = &loaded.document.simulations;
    assert_eq!(
        sims[0].simulated_mod_id(),
        Some(configurations.get(&config_id("c2")).unwrap().mod_id())
    );
    assert_eq!(
        sims[1].simulated_mod_id(),
        Some(configurations.get(&config_id("c1")).unwrap().mod_id())
    );
}

#[test]
fn unknown_simulation_configuration_uses_default() {
    let xml = document(
        r#"<motorconfiguration configid="c1" default="TRUE"/>"#,
        r#"<simulations><simulation status="outdated">
             <name>Ghost run</name>
             <conditions><configid>ghost</configid></conditions>
           </simulation></simulations>"#,
    );
    let loaded = load(&xml);

    assert!(
        loaded
            .warnings
            .mentions("Simulation 'Ghost run' refers to unknown flight configuration 'ghost'")
    );
    assert_eq!(loaded.warnings.len(), 1);

    let sim = &loaded.document.simulations[0];
    assert_eq!(sim.options.configuration_id, None);
    let configurations = loaded.document.rocket.configurations();
    assert_eq!(configurations.default_configuration().unwrap().id(), &config_id("c1"));
    assert_eq!(
        sim.simulated_mod_id(),
        Some(configurations.get(&config_id("c1")).unwrap().mod_id())
    );
}

#[test]
fn stored_warnings_keep_their_ids() {
    let first = "11111111-1111-4111-8111-111111111111";
    let second = "22222222-2222-4222-8222-222222222222";
    let xml = document(
        "",
        &format!(
            r#"<simulations><simulation status="loaded"><conditions/>
                 <flightdata>
                   <warning type="LargeAOA"><id>{first}</id><parameter>0.3</parameter></warning>
                   <warning type="LargeAOA"><id>{second}</id><parameter>0.3</parameter></warning>
                   <warning type="LargeAOA"><id>{second}</id><parameter>0.3</parameter></warning>
                   <databranch name="Sustainer" types="Time">
                     <event time="2" type="simwarn" warnid="{second}"/>
                     <datapoint>0</datapoint>
                   </databranch>
                 </flightdata>
               </simulation></simulations>"#
        ),
    );
    let loaded = load(&xml);
    assert!(loaded.warnings.is_empty(), "{:?}", warning_texts(&loaded));

    let data = loaded.document.simulations[0].flight_data.as_ref().unwrap();
    let ids: Vec<String> = data.warnings().iter().map(|w| w.id.to_string()).collect();
    assert_eq!(ids, [first, second]);

    let event = &data.branches()[0].events()[0];
    let warning_id = event.warning_id.as_deref().unwrap();
    let referenced = data
        .warnings()
        .iter()
        .find(|w| w.id.to_string() == warning_id)
        .unwrap();
    assert_eq!(referenced.kind, WarningKind::LargeAngleOfAttack);
}
