//! Model import rules.
//!
//! Scale, vertex optimization and lightmap UV findings describe settings the
//! importer corrects on its own (see [`crate::import`]); the remaining rules
//! are advisory.

use crate::import::lightmap_uvs_requested;
use crate::report::{Finding, Severity};
use crate::rules::{AssetData, AuditRule};
use artaudit_rules::{AnimationType, AssetKind, RuleSet};

/// Returns all model rules.
pub fn all_rules() -> Vec<Box<dyn AuditRule>> {
    vec![
        // Error-level rules
        Box::new(AnimationTypeRule),
        // Warning-level rules
        Box::new(ScaleRule),
        Box::new(OptimizeVerticesRule),
        Box::new(LightmapUvRule),
        Box::new(MeshColliderRule),
        Box::new(TriangleCountRule),
        Box::new(MissingUv2Rule),
        Box::new(VertexCountRule),
    ]
}

/// Rule: model/scale
pub struct ScaleRule;

impl AuditRule for ScaleRule {
    fn id(&self) -> &'static str {
        "model/scale"
    }

    fn description(&self) -> &'static str {
        "Global scale differs from the required model scale"
    }

    fn applies_to(&self) -> &[AssetKind] {
        &[AssetKind::Model]
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, asset: &AssetData, rules: &RuleSet) -> Vec<Finding> {
        let AssetData::Model(model) = asset else {
            return vec![];
        };
        let scale = model.settings.global_scale;
        if (scale - rules.required_model_scale).abs() <= f32::EPSILON {
            return vec![];
        }

        vec![Finding::new(
            self.id(),
            &model.path,
            self.default_severity(),
            format!(
                "Model '{}' has non-standard global scale ({}). Setting to {}.",
                model.path, scale, rules.required_model_scale
            ),
            "Scale is corrected on import; export the model at the project's unit scale.",
        )]
    }
}

/// Rule: model/optimize-vertices
pub struct OptimizeVerticesRule;

impl AuditRule for OptimizeVerticesRule {
    fn id(&self) -> &'static str {
        "model/optimize-vertices"
    }

    fn description(&self) -> &'static str {
        "Mesh vertex optimization is disabled"
    }

    fn applies_to(&self) -> &[AssetKind] {
        &[AssetKind::Model]
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, asset: &AssetData, _rules: &RuleSet) -> Vec<Finding> {
        let AssetData::Model(model) = asset else {
            return vec![];
        };
        if model.settings.optimize_mesh_vertices {
            return vec![];
        }

        vec![Finding::new(
            self.id(),
            &model.path,
            self.default_severity(),
            format!(
                "Model '{}' has 'Optimize Mesh Vertices' disabled. Enabling it for better performance.",
                model.path
            ),
            "Vertex optimization is enabled on import.",
        )]
    }
}

/// Rule: model/lightmap-uvs
/// Static geometry without generated lightmap UVs.
pub struct LightmapUvRule;

impl AuditRule for LightmapUvRule {
    fn id(&self) -> &'static str {
        "model/lightmap-uvs"
    }

    fn description(&self) -> &'static str {
        "Static geometry does not generate lightmap UVs"
    }

    fn applies_to(&self) -> &[AssetKind] {
        &[AssetKind::Model]
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, asset: &AssetData, rules: &RuleSet) -> Vec<Finding> {
        let AssetData::Model(model) = asset else {
            return vec![];
        };
        if model.settings.generate_secondary_uv || !rules.is_static_geometry(&model.path) {
            return vec![];
        }

        vec![Finding::new(
            self.id(),
            &model.path,
            self.default_severity(),
            format!(
                "Model '{}' is likely static geometry but 'Generate Lightmap UVs' is disabled. Enabling it.",
                model.path
            ),
            "Lightmap UV generation is enabled on import.",
        )]
    }
}

/// Rule: model/animation-type
/// Rig type sanity: informational for rigged models, error for characters
/// imported without a rig.
pub struct AnimationTypeRule;

impl AuditRule for AnimationTypeRule {
    fn id(&self) -> &'static str {
        "model/animation-type"
    }

    fn description(&self) -> &'static str {
        "Animation type does not fit the model"
    }

    fn applies_to(&self) -> &[AssetKind] {
        &[AssetKind::Model]
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, asset: &AssetData, rules: &RuleSet) -> Vec<Finding> {
        let AssetData::Model(model) = asset else {
            return vec![];
        };

        let finding = match model.settings.animation_type {
            AnimationType::Human => Finding::new(
                self.id(),
                &model.path,
                Severity::Info,
                format!("Model '{}' is configured as Humanoid.", model.path),
                "Ensure the Avatar configuration is correct.",
            ),
            AnimationType::Generic => Finding::new(
                self.id(),
                &model.path,
                Severity::Info,
                format!("Model '{}' is configured as Generic.", model.path),
                "Ensure the Generic rig setup is correct.",
            ),
            AnimationType::None if rules.is_character(&model.path) => Finding::new(
                self.id(),
                &model.path,
                self.default_severity(),
                format!(
                    "Model '{}' seems to be a character but has Animation Type set to 'None'.",
                    model.path
                ),
                "Set the animation type to Humanoid or Generic.",
            ),
            AnimationType::None | AnimationType::Legacy => return vec![],
        };
        vec![finding]
    }
}

/// Rule: model/mesh-collider
/// Collider generation produces mesh colliders, which are expensive.
pub struct MeshColliderRule;

impl AuditRule for MeshColliderRule {
    fn id(&self) -> &'static str {
        "model/mesh-collider"
    }

    fn description(&self) -> &'static str {
        "Import generates mesh colliders"
    }

    fn applies_to(&self) -> &[AssetKind] {
        &[AssetKind::Model]
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, asset: &AssetData, rules: &RuleSet) -> Vec<Finding> {
        let AssetData::Model(model) = asset else {
            return vec![];
        };
        if !model.settings.generate_colliders || rules.allow_generate_colliders {
            return vec![];
        }

        vec![Finding::new(
            self.id(),
            &model.path,
            self.default_severity(),
            format!(
                "Model '{}' has a MeshCollider generated during import. This is often inefficient.",
                model.path
            ),
            "Disable 'Generate Colliders' and add simpler colliders manually.",
        )]
    }
}

/// Rule: model/triangle-count
pub struct TriangleCountRule;

impl AuditRule for TriangleCountRule {
    fn id(&self) -> &'static str {
        "model/triangle-count"
    }

    fn description(&self) -> &'static str {
        "Mesh exceeds the triangle budget"
    }

    fn applies_to(&self) -> &[AssetKind] {
        &[AssetKind::Model]
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, asset: &AssetData, rules: &RuleSet) -> Vec<Finding> {
        let AssetData::Model(model) = asset else {
            return vec![];
        };

        model
            .meshes
            .iter()
            .filter(|mesh| mesh.triangle_count > rules.max_triangles_for_prop)
            .map(|mesh| {
                Finding::new(
                    self.id(),
                    &model.path,
                    self.default_severity(),
                    format!(
                        "Mesh '{}' in '{}' has too many triangles ({}, max {}).",
                        mesh.name, model.path, mesh.triangle_count, rules.max_triangles_for_prop
                    ),
                    "Consider optimizing the mesh or adding LODs.",
                )
            })
            .collect()
    }
}

/// Rule: model/missing-uv2
/// Lightmap UVs are requested but a mesh has no secondary UV channel.
pub struct MissingUv2Rule;

impl AuditRule for MissingUv2Rule {
    fn id(&self) -> &'static str {
        "model/missing-uv2"
    }

    fn description(&self) -> &'static str {
        "Mesh lacks a secondary UV channel while lightmap UVs are requested"
    }

    fn applies_to(&self) -> &[AssetKind] {
        &[AssetKind::Model]
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, asset: &AssetData, rules: &RuleSet) -> Vec<Finding> {
        let AssetData::Model(model) = asset else {
            return vec![];
        };
        if !lightmap_uvs_requested(model, rules) {
            return vec![];
        }

        model
            .meshes
            .iter()
            .filter(|mesh| !mesh.has_uv2)
            .map(|mesh| {
                Finding::new(
                    self.id(),
                    &model.path,
                    self.default_severity(),
                    format!(
                        "Model '{}' was set to generate Lightmap UVs, but mesh '{}' has no UV2 channel.",
                        model.path, mesh.name
                    ),
                    "Author a second UV set in the source file or check the UV generation settings.",
                )
            })
            .collect()
    }
}

/// Rule: model/vertex-count
/// Character mesh exceeds the vertex budget.
pub struct VertexCountRule;

impl AuditRule for VertexCountRule {
    fn id(&self) -> &'static str {
        "model/vertex-count"
    }

    fn description(&self) -> &'static str {
        "Character mesh exceeds the vertex budget"
    }

    fn applies_to(&self) -> &[AssetKind] {
        &[AssetKind::Model]
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, asset: &AssetData, rules: &RuleSet) -> Vec<Finding> {
        let AssetData::Model(model) = asset else {
            return vec![];
        };
        if !rules.is_character(&model.path) {
            return vec![];
        }

        model
            .meshes
            .iter()
            .filter(|mesh| mesh.vertex_count > rules.max_vertices_for_character)
            .map(|mesh| {
                Finding::new(
                    self.id(),
                    &model.path,
                    self.default_severity(),
                    format!(
                        "Character mesh '{}' in '{}' has {} vertices (max {}).",
                        mesh.name,
                        model.path,
                        mesh.vertex_count,
                        rules.max_vertices_for_character
                    ),
                    "Reduce the character's vertex count or split it into LODs.",
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artaudit_rules::{MeshStats, ModelImport, ModelImportSettings};

    fn mesh(name: &str, triangles: u32, vertices: u32, has_uv2: bool) -> MeshStats {
        MeshStats {
            name: name.to_string(),
            triangle_count: triangles,
            vertex_count: vertices,
            has_uv2,
        }
    }

    fn model(path: &str, settings: ModelImportSettings) -> ModelImport {
        ModelImport::new(path, settings)
    }

    fn run(rule: &dyn AuditRule, model: &ModelImport) -> Vec<Finding> {
        rule.check(&AssetData::Model(model), &RuleSet::default())
    }

    #[test]
    fn test_scale_rule() {
        let scaled = model(
            "Art/Props/Barrel.fbx",
            ModelImportSettings {
                global_scale: 2.0,
                ..Default::default()
            },
        );
        let findings = run(&ScaleRule, &scaled);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity(), Severity::Warning);

        let unit = model("Art/Props/Barrel.fbx", ModelImportSettings::default());
        assert!(run(&ScaleRule, &unit).is_empty());
    }

    #[test]
    fn test_optimize_vertices_rule() {
        let off = model(
            "Art/Props/Barrel.fbx",
            ModelImportSettings {
                optimize_mesh_vertices: false,
                ..Default::default()
            },
        );
        assert_eq!(run(&OptimizeVerticesRule, &off).len(), 1);
    }

    #[test]
    fn test_lightmap_uv_rule_only_for_static_geometry() {
        let wall = model("Art/LevelGeometry/Wall.fbx", ModelImportSettings::default());
        assert_eq!(run(&LightmapUvRule, &wall).len(), 1);

        let barrel = model("Art/Props/Barrel.fbx", ModelImportSettings::default());
        assert!(run(&LightmapUvRule, &barrel).is_empty());
    }

    #[test]
    fn test_animation_type_rule() {
        let none = |path: &str| {
            model(
                path,
                ModelImportSettings {
                    animation_type: AnimationType::None,
                    ..Default::default()
                },
            )
        };

        let hero = run(&AnimationTypeRule, &none("Art/Characters/Hero.fbx"));
        assert_eq!(hero.len(), 1);
        assert_eq!(hero[0].severity(), Severity::Error);

        assert!(run(&AnimationTypeRule, &none("Art/CharacterProps/Hat.fbx")).is_empty());
        assert!(run(&AnimationTypeRule, &none("Art/Env/Rock.fbx")).is_empty());

        let generic = model("Art/Env/Crane.fbx", ModelImportSettings::default());
        let findings = run(&AnimationTypeRule, &generic);
        assert_eq!(findings[0].severity(), Severity::Info);
    }

    #[test]
    fn test_mesh_collider_rule() {
        let colliders = model(
            "Art/Props/Barrel.fbx",
            ModelImportSettings {
                generate_colliders: true,
                ..Default::default()
            },
        );
        assert_eq!(run(&MeshColliderRule, &colliders).len(), 1);

        let allowed = RuleSet {
            allow_generate_colliders: true,
            ..RuleSet::default()
        };
        assert!(MeshColliderRule
            .check(&AssetData::Model(&colliders), &allowed)
            .is_empty());
    }

    #[test]
    fn test_triangle_count_rule_per_mesh() {
        let heavy = model("Art/Props/Statue.fbx", ModelImportSettings::default())
            .with_mesh(mesh("Body", 6000, 3100, true))
            .with_mesh(mesh("Base", 200, 120, true))
            .with_mesh(mesh("Cloak", 5001, 2600, true));
        let findings = run(&TriangleCountRule, &heavy);
        assert_eq!(findings.len(), 2);
        assert!(findings[0].message().contains("'Body'"));
        assert!(findings[1].message().contains("'Cloak'"));
    }

    #[test]
    fn test_missing_uv2_rule() {
        let requested = model(
            "Art/Props/Crate.fbx",
            ModelImportSettings {
                generate_secondary_uv: true,
                ..Default::default()
            },
        )
        .with_mesh(mesh("Crate", 12, 24, false))
        .with_mesh(mesh("Lid", 12, 24, true));
        assert_eq!(run(&MissingUv2Rule, &requested).len(), 1);

        // Static geometry requests lightmap UVs through the import correction.
        let wall = model("Art/StaticProp/Wall.fbx", ModelImportSettings::default())
            .with_mesh(mesh("Wall", 12, 24, false));
        assert_eq!(run(&MissingUv2Rule, &wall).len(), 1);

        let barrel = model("Art/Props/Barrel.fbx", ModelImportSettings::default())
            .with_mesh(mesh("Barrel", 12, 24, false));
        assert!(run(&MissingUv2Rule, &barrel).is_empty());
    }

    #[test]
    fn test_vertex_count_rule_only_for_characters() {
        let hero = model("Art/Characters/Hero.fbx", ModelImportSettings::default())
            .with_mesh(mesh("Body", 4000, 12_000, true));
        assert_eq!(run(&VertexCountRule, &hero).len(), 1);

        let statue = model("Art/Env/Statue.fbx", ModelImportSettings::default())
            .with_mesh(mesh("Body", 4000, 12_000, true));
        assert!(run(&VertexCountRule, &statue).is_empty());
    }
}
