
use ork::{
    Color, ComponentData, ComponentKind, ComponentPreset, EdgeMode, FinShape, ImportContext,
    PresetCatalog, PresetProperties, PresetType, RocketComponent, WarningKind,
};
use test_helpers::*;

#[test]
fn components_keep_document_order() {
    let xml = document(
        &single_stage(
            r#"
            <nosecone><name>Nose</name><length>0.1</length></nosecone>
            <bodytube><name>Body</name><length>0.3</length><radius>auto</radius>
              <subcomponents>
                <trapezoidfinset><name>Fins</name><fincount>4</fincount></trapezoidfinset>
              </subcomponents>
            </bodytube>"#,
        ),
        "",
    );
    let loaded = load(&xml);
    assert!(loaded.warnings.is_empty(), "{:?}", warning_texts(&loaded));

    let rocket = &loaded.document.rocket;
    let stages = rocket.children(rocket.root());
    assert_eq!(stages.len(), 1);
    let names: Vec<&str> = rocket
        .children(stages[0])
        .iter()
        .map(|&i| rocket.component(i).name.as_str())
        .collect();
    assert_eq!(names, ["Nose", "Body"]);

    match component(&loaded.document, "Body").data() {
        ComponentData::BodyTube(tube) => {
            assert_eq!(tube.shell.length, 0.3);
            assert!(tube.outer_radius_auto);
        }
        other => panic!("unexpected data {other:?}"),
    }
    assert_eq!(
        component(&loaded.document, "Fins").kind(),
        ComponentKind::TrapezoidFinSet
    );
}

#[test]
fn bad_number_warns_once_and_keeps_value() {
    let xml = document(
        &single_stage("<bodytube><name>Body</name><length>abc</length></bodytube>"),
        "",
    );
    let loaded = load(&xml);

    assert_eq!(loaded.warnings.len(), 1);
    let warning = loaded.warnings.iter().next().unwrap();
    assert_eq!(warning.kind, WarningKind::FileInvalidParameter);

    let fresh = RocketComponent::new(ComponentKind::BodyTube);
    assert_eq!(component(&loaded.document, "Body").data(), fresh.data());
}

#[test]
fn color_without_alpha_is_opaque() {
    let xml = document(
        &single_stage(
            r#"<bodytube><name>Body</name><color red="10" green="20" blue="30"/></bodytube>"#,
        ),
        "",
    );
    let loaded = load(&xml);
    assert!(loaded.warnings.is_empty(), "{:?}", warning_texts(&loaded));
    assert_eq!(
        component(&loaded.document, "Body").color,
        Some(Color::rgba(10, 20, 30, 255))
    );
}

#[test]
fn unknown_parameters_and_components_are_skipped() {
    let xml = document(
        &single_stage(
            r#"
            <warpdrive><name>Drive</name></warpdrive>
            <nosecone><name>Nose</name><foreradius>0.01</foreradius></nosecone>
            <bodytube><name>Body</name><wingspan>3</wingspan></bodytube>"#,
        ),
        "",
    );
    let loaded = load(&xml);

    assert!(loaded.warnings.mentions("Unknown element 'warpdrive'"));
    assert!(loaded.warnings.mentions("Unknown parameter type 'foreradius'"));
    assert!(loaded.warnings.mentions("Unknown parameter type 'wingspan'"));
    assert_eq!(loaded.warnings.len(), 3);
    assert!(loaded.document.rocket.iter().all(|(_, c)| c.name != "Drive"));
    component(&loaded.document, "Body");
}

#[test]
fn angles_are_stored_in_radians() {
    let xml = document(
        &single_stage(
            r#"<bodytube><name>Body</name><subcomponents>
                 <trapezoidfinset><name>Fins</name><cant>90</cant>
                   <angleoffset method="relative">180</angleoffset>
                 </trapezoidfinset>
               </subcomponents></bodytube>"#,
        ),
        "",
    );
    let loaded = load(&xml);
    assert!(loaded.warnings.is_empty(), "{:?}", warning_texts(&loaded));

    let fins = component(&loaded.document, "Fins");
    match fins.data() {
        ComponentData::FinSet(set) => {
            assert!((set.cant_angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12)
        }
        other => panic!("unexpected data {other:?}"),
    }
    let angular = fins.angular().unwrap();
    assert!((angular.offset - std::f64::consts::PI).abs() < 1e-12);
}

#[test]
fn freeform_fin_points() {
    let fins = |points: &str| {
        document(
            &single_stage(&format!(
                r#"<bodytube><name>Body</name><subcomponents>
                     <freeformfinset><name>Fins</name><finpoints>{points}</finpoints></freeformfinset>
                   </subcomponents></bodytube>"#
            )),
            "",
        )
    };

    let loaded = load(&fins(
        r#"<point x="0" y="0"/><point x="0.05" y="0.03"/><point x="0.08" y="0"/>"#,
    ));
    assert!(loaded.warnings.is_empty(), "{:?}", warning_texts(&loaded));
    match component(&loaded.document, "Fins").data() {
        ComponentData::FinSet(set) => {
            assert!(matches!(set.shape, FinShape::Freeform(_)));
            assert_eq!(set.points().unwrap().len(), 3);
        }
        other => panic!("unexpected data {other:?}"),
    }

    let loaded = load(&fins(
        r#"<point x="0" y="0"/><point x="0.05" y="0.03"/><point x="0.08" y="0.01"/>"#,
    ));
    assert!(loaded.warnings.mentions("Freeform fin set points are illegal"));
}

fn tube_preset(outer_diameter: f64) -> ComponentPreset {
    ComponentPreset::new(
        PresetType::BodyTube,
        "Estes",
        "BT-50",
        None,
        PresetProperties {
            outer_diameter: Some(outer_diameter),
            length: Some(0.45),
            ..Default::default()
        },
    )
}

#[test]
fn preset_matching_digest_wins_and_survives_field_loading() {
    let first = tube_preset(0.0248);
    let second = tube_preset(0.0250);
    let wanted = second.digest().to_string();
    let cx = ImportContext::default().with_presets(PresetCatalog::new(vec![first, second]));

    let xml = document(
        &single_stage(&format!(
            r#"<bodytube><name>Body</name>
                 <preset type="BODY_TUBE" manufacturer="Estes" partno="BT-50" digest="{wanted}"/>
                 <length>0.5</length>
               </bodytube>"#
        )),
        "",
    );
    let loaded = load_with(&xml, &cx);
    assert!(loaded.warnings.is_empty(), "{:?}", warning_texts(&loaded));

    let body = component(&loaded.document, "Body");
    assert_eq!(body.name, "Body");
    assert_eq!(body.preset().map(|p| p.digest()), Some(wanted.as_str()));
    match body.data() {
        ComponentData::BodyTube(tube) => {
            assert_eq!(tube.outer_radius, 0.0125);
            assert_eq!(tube.shell.length, 0.5);
        }
        other => panic!("unexpected data {other:?}"),
    }
}

#[test]
fn preset_without_digest_match_takes_first_of_type() {
    let cx = ImportContext::default()
        .with_presets(PresetCatalog::new(vec![tube_preset(0.0248), tube_preset(0.0250)]));
    let xml = document(
        &single_stage(
            r#"<bodytube><name>Body</name>
                 <preset type="body tube" manufacturer="Estes" partno="BT-50" digest="stale"/>
               </bodytube>"#,
        ),
        "",
    );
    let loaded = load_with(&xml, &cx);

    assert!(loaded.warnings.mentions("has wrong digest"));
    let body = component(&loaded.document, "Body");
    assert_eq!(
        body.preset().map(|p| p.digest()),
        Some(tube_preset(0.0248).digest())
    );
}

#[test]
fn appearance_is_committed_with_decal() {
    let xml = document(
        &single_stage(
            r#"<bodytube><name>Body</name>
                 <appearance>
                   <paint red="200" green="30" blue="30" alpha="128"/>
                   <shine>0.4</shine>
                   <decal name="decals/logo.png" rotation="0.5" edgemode="mirror">
                     <center x="0.5" y="0.25"/>
                     <scale x="2" y="2"/>
                   </decal>
                 </appearance>
                 <insideappearance>
                   <paint red="0" green="0" blue="0"/>
                   <edgesSameAsInside>true</edgesSameAsInside>
                 </insideappearance>
               </bodytube>"#,
        ),
        "",
    );
    let loaded = load(&xml);
    assert!(loaded.warnings.is_empty(), "{:?}", warning_texts(&loaded));

    let body = component(&loaded.document, "Body");
    let appearance = body.appearance.as_ref().unwrap();
    assert_eq!(appearance.paint, Color::rgba(200, 30, 30, 128));
    assert_eq!(appearance.shine, 0.4);
    let decal = appearance.decal.as_ref().unwrap();
    assert_eq!(decal.image, "decals/logo.png");
    assert_eq!(decal.edge_mode, EdgeMode::Mirror);
    assert_eq!((decal.center.x, decal.center.y), (0.5, 0.25));
    assert_eq!((decal.offset.x, decal.offset.y), (0.0, 0.0));
    assert_eq!((decal.scale.x, decal.scale.y), (2.0, 2.0));

    let inside = body.inside_appearance().unwrap();
    assert_eq!(inside.appearance.paint, Color::rgb(0, 0, 0));
    assert!(inside.edges_same_as_inside);
    assert!(!inside.inside_same_as_outside);
}

#[test]
fn inside_appearance_refused_without_inner_surface() {
    let xml = document(
        &single_stage(
            r#"<railbutton><name>Button</name>
                 <insideappearance><paint red="0" green="0" blue="0"/></insideappearance>
               </railbutton>"#,
        ),
        "",
    );
    let loaded = load(&xml);
    assert!(loaded.warnings.mentions("<insideappearance> is not allowed"));
    assert_eq!(loaded.warnings.len(), 1);
    assert!(component(&loaded.document, "Button").inside_appearance().is_none());
}
